use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use mealplanner_people::PersonInput;
use mealplanner_shared::person::Person;

use super::AppState;
use crate::error::{AppError, AppResult};

pub async fn list(State(app): State<AppState>) -> AppResult<Json<Vec<Person>>> {
    Ok(Json(mealplanner_people::Query(app.state).all().await?))
}

pub async fn find(State(app): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Person>> {
    match mealplanner_people::Query(app.state).find(&id).await? {
        Some(person) => Ok(Json(person)),
        None => Err(AppError::NotFound(format!("person {id} not found"))),
    }
}

pub async fn create(
    State(app): State<AppState>,
    Json(input): Json<PersonInput>,
) -> AppResult<impl IntoResponse> {
    let person = mealplanner_people::Command(app.state).create(input).await?;

    Ok((StatusCode::CREATED, Json(person)))
}

pub async fn update(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PersonInput>,
) -> AppResult<Json<Person>> {
    Ok(Json(
        mealplanner_people::Command(app.state).update(id, input).await?,
    ))
}

pub async fn delete(State(app): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    mealplanner_people::Command(app.state).delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
