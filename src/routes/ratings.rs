use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use mealplanner_meal::rating::{RatingCommand, RatingInput, RatingQuery, RatingUpdate};
use mealplanner_shared::rating::Rating;
use serde::Serialize;

use super::AppState;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageRating {
    pub meal_id: String,
    pub average: Option<f64>,
    pub count: usize,
}

/// GET /api/ratings/meal/{meal_id} - latest rating of each person
pub async fn for_meal(
    State(app): State<AppState>,
    Path(meal_id): Path<String>,
) -> AppResult<Json<Vec<Rating>>> {
    Ok(Json(RatingQuery(app.state).for_meal(meal_id).await?))
}

pub async fn average(
    State(app): State<AppState>,
    Path(meal_id): Path<String>,
) -> AppResult<Json<AverageRating>> {
    let ratings = RatingQuery(app.state).for_meal(&meal_id).await?;

    Ok(Json(AverageRating {
        average: mealplanner_meal::rating::average_rating(&ratings),
        count: ratings.len(),
        meal_id,
    }))
}

pub async fn create(
    State(app): State<AppState>,
    Json(input): Json<RatingInput>,
) -> AppResult<impl IntoResponse> {
    let rating = RatingCommand(app.state).rate(input).await?;

    Ok((StatusCode::CREATED, Json(rating)))
}

pub async fn update(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RatingUpdate>,
) -> AppResult<Json<Rating>> {
    Ok(Json(RatingCommand(app.state).update(id, input).await?))
}

pub async fn delete(State(app): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    RatingCommand(app.state).delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
