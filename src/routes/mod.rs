use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;
use time::Weekday;

mod health;
mod meal_plans;
mod meals;
mod people;
mod ratings;

#[derive(Clone)]
pub struct AppState {
    pub state: mealplanner_shared::State,
    pub week_anchor: Weekday,
}

pub async fn fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "not_found", "message": "route not found"})),
    )
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.state.read_db.clone())
        .route("/api/meals", get(meals::list).post(meals::create))
        .route("/api/meals/export", get(meals::export))
        .route("/api/meals/import", post(meals::import))
        .route(
            "/api/meals/{id}",
            get(meals::find).put(meals::update).delete(meals::delete),
        )
        .route("/api/people", get(people::list).post(people::create))
        .route(
            "/api/people/{id}",
            get(people::find).put(people::update).delete(people::delete),
        )
        .route("/api/meal-plans", get(meal_plans::list))
        .route("/api/meal-plans/week", get(meal_plans::week))
        .route("/api/meal-plans/summary", get(meal_plans::summary))
        .route(
            "/api/meal-plans/shopping-list",
            get(meal_plans::range_shopping_list),
        )
        .route("/api/meal-plans/{plan_id}", get(meal_plans::find))
        .route(
            "/api/meal-plans/{plan_id}/entries",
            post(meal_plans::add_entry),
        )
        .route(
            "/api/meal-plans/{plan_id}/notes",
            put(meal_plans::update_notes),
        )
        .route(
            "/api/meal-plans/{plan_id}/shopping-list",
            get(meal_plans::plan_shopping_list),
        )
        .route(
            "/api/meal-plans/entries/{entry_id}",
            put(meal_plans::update_entry).delete(meal_plans::delete_entry),
        )
        .route("/api/ratings", post(ratings::create))
        .route(
            "/api/ratings/{id}",
            put(ratings::update).delete(ratings::delete),
        )
        .route("/api/ratings/meal/{meal_id}", get(ratings::for_meal))
        .route(
            "/api/ratings/meal/{meal_id}/average",
            get(ratings::average),
        )
        .fallback(fallback)
        .with_state(app_state)
}
