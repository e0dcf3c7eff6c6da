use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use mealplanner_meal::{ImportResult, MealInput};
use mealplanner_shared::meal::Meal;
use serde::Deserialize;

use super::AppState;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
}

fn query(app: &AppState) -> mealplanner_meal::Query {
    mealplanner_meal::Query(app.state.clone())
}

fn command(app: &AppState) -> mealplanner_meal::Command {
    mealplanner_meal::Command(app.state.clone())
}

/// GET /api/meals?search=
pub async fn list(
    State(app): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Meal>>> {
    Ok(Json(query(&app).all(params.search.as_deref()).await?))
}

pub async fn find(State(app): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Meal>> {
    match query(&app).find(&id).await? {
        Some(meal) => Ok(Json(meal)),
        None => Err(AppError::NotFound(format!("meal {id} not found"))),
    }
}

pub async fn create(
    State(app): State<AppState>,
    Json(input): Json<MealInput>,
) -> AppResult<impl IntoResponse> {
    let meal = command(&app).create(input).await?;

    Ok((StatusCode::CREATED, Json(meal)))
}

pub async fn update(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<MealInput>,
) -> AppResult<Json<Meal>> {
    Ok(Json(command(&app).update(id, input).await?))
}

pub async fn delete(State(app): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    command(&app).delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/meals/export - every meal, in the shape import accepts
pub async fn export(State(app): State<AppState>) -> AppResult<Json<Vec<Meal>>> {
    Ok(Json(query(&app).all(None).await?))
}

/// POST /api/meals/import - skips titles already in the catalog
pub async fn import(
    State(app): State<AppState>,
    Json(inputs): Json<Vec<MealInput>>,
) -> AppResult<Json<ImportResult>> {
    Ok(Json(command(&app).import(inputs).await?))
}
