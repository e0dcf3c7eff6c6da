use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<mealplanner_shared::Error> for AppError {
    fn from(err: mealplanner_shared::Error) -> Self {
        match err {
            mealplanner_shared::Error::Validate(errors) => AppError::Validation(errors.to_string()),
            mealplanner_shared::Error::NotFound(_) => AppError::NotFound(err.to_string()),
            mealplanner_shared::Error::Server(msg) => AppError::BadRequest(msg),
            mealplanner_shared::Error::Unknown(e) => AppError::Internal(e),
        }
    }
}

impl From<mealplanner_mealplan::CalendarError> for AppError {
    fn from(err: mealplanner_mealplan::CalendarError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Internal(e) => {
                tracing::error!(error = ?e, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        (
            status,
            Json(json!({
                "error": error,
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                AppError::from(mealplanner_shared::Error::NotFound("meal m1".to_owned())),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(mealplanner_shared::Error::Server("bad range".to_owned())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(anyhow::anyhow!("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let error = AppError::from(anyhow::anyhow!("secret path /var/db"));

        assert_eq!(error.to_string(), "Internal server error");
    }
}
