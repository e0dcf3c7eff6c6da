use std::collections::{BTreeMap, BTreeSet, HashMap};

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use mealplanner_mealplan::{AddEntryInput, UpdateEntryInput, calendar};
use mealplanner_shared::{
    mealplan::{DayOfWeek, PlanEntry, WeeklyPlan},
    shopping::ShoppingListItem,
};
use mealplanner_shopping::SortOrder;
use serde::{Deserialize, Serialize};
use time::Date;

use super::AppState;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct WeekParams {
    pub date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeParams {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SortParams {
    #[serde(default)]
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesInput {
    pub day_notes: BTreeMap<DayOfWeek, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEntry {
    #[serde(flatten)]
    pub entry: PlanEntry,
    pub meal_title: Option<String>,
    pub cook_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDay {
    pub date: Date,
    pub day_of_week: DayOfWeek,
    pub plan_id: Option<String>,
    pub notes: Option<String>,
    pub entries: Vec<SummaryEntry>,
}

fn parse_date(value: &str) -> AppResult<Date> {
    Ok(calendar::parse_date(value)?)
}

fn parse_sort(value: Option<&str>) -> AppResult<SortOrder> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => value
            .parse::<SortOrder>()
            .map_err(|_| AppError::BadRequest(format!("unknown sort `{value}`"))),
        None => Ok(SortOrder::default()),
    }
}

fn plans(app: &AppState) -> mealplanner_mealplan::Query {
    mealplanner_mealplan::Query(app.state.clone())
}

fn command(app: &AppState) -> mealplanner_mealplan::Command {
    mealplanner_mealplan::Command(app.state.clone())
}

/// GET /api/meal-plans - newest week first
pub async fn list(State(app): State<AppState>) -> AppResult<Json<Vec<WeeklyPlan>>> {
    Ok(Json(plans(&app).all().await?))
}

/// GET /api/meal-plans/week?date= - plan of the week holding `date`,
/// created on first access
pub async fn week(
    State(app): State<AppState>,
    Query(params): Query<WeekParams>,
) -> AppResult<Json<WeeklyPlan>> {
    let date = parse_date(&params.date)?;

    Ok(Json(
        command(&app)
            .get_or_create_for_week(date, app.week_anchor)
            .await?,
    ))
}

pub async fn find(
    State(app): State<AppState>,
    Path(plan_id): Path<String>,
) -> AppResult<Json<WeeklyPlan>> {
    match plans(&app).find(&plan_id).await? {
        Some(plan) => Ok(Json(plan)),
        None => Err(AppError::NotFound(format!("meal plan {plan_id} not found"))),
    }
}

pub async fn add_entry(
    State(app): State<AppState>,
    Path(plan_id): Path<String>,
    Json(input): Json<AddEntryInput>,
) -> AppResult<impl IntoResponse> {
    let entry = command(&app).add_entry(plan_id, input).await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_entry(
    State(app): State<AppState>,
    Path(entry_id): Path<String>,
    Json(input): Json<UpdateEntryInput>,
) -> AppResult<Json<PlanEntry>> {
    Ok(Json(command(&app).update_entry(entry_id, input).await?))
}

pub async fn delete_entry(
    State(app): State<AppState>,
    Path(entry_id): Path<String>,
) -> AppResult<StatusCode> {
    command(&app).delete_entry(entry_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/meal-plans/{plan_id}/notes - replaces every note of the plan
pub async fn update_notes(
    State(app): State<AppState>,
    Path(plan_id): Path<String>,
    Json(input): Json<NotesInput>,
) -> AppResult<Json<WeeklyPlan>> {
    Ok(Json(
        command(&app)
            .update_day_notes(plan_id, input.day_notes)
            .await?,
    ))
}

pub async fn plan_shopping_list(
    State(app): State<AppState>,
    Path(plan_id): Path<String>,
    Query(params): Query<SortParams>,
) -> AppResult<Json<Vec<ShoppingListItem>>> {
    let sort = parse_sort(params.sort.as_deref())?;

    Ok(Json(
        mealplanner_shopping::Query(app.state)
            .for_plan(plan_id, sort)
            .await?,
    ))
}

pub async fn range_shopping_list(
    State(app): State<AppState>,
    Query(params): Query<RangeParams>,
) -> AppResult<Json<Vec<ShoppingListItem>>> {
    let start = parse_date(&params.start_date)?;
    let end = parse_date(&params.end_date)?;
    let sort = parse_sort(params.sort.as_deref())?;

    Ok(Json(
        mealplanner_shopping::Query(app.state)
            .for_range(start, end, sort)
            .await?,
    ))
}

/// GET /api/meal-plans/summary?startDate=&endDate= - one row per day with
/// meal titles and cook names
pub async fn summary(
    State(app): State<AppState>,
    Query(params): Query<RangeParams>,
) -> AppResult<Json<Vec<SummaryDay>>> {
    let start = parse_date(&params.start_date)?;
    let end = parse_date(&params.end_date)?;
    calendar::date_range(start, end)?;

    let plans = plans(&app).filter_between(start, end).await?;
    let days = mealplanner_mealplan::resolve_range(start, end, &plans)?;

    let entries = days.iter().flat_map(|day| day.entries.iter());
    let meal_ids = entries
        .clone()
        .map(|entry| entry.meal_id.to_owned())
        .collect::<BTreeSet<_>>();
    let cook_ids = entries
        .filter_map(|entry| entry.assigned_cook_id.to_owned())
        .collect::<BTreeSet<_>>();

    let titles = mealplanner_meal::Query(app.state.clone())
        .find_many(meal_ids.into_iter().collect())
        .await?
        .into_iter()
        .map(|meal| (meal.id, meal.title))
        .collect::<HashMap<_, _>>();
    let names = mealplanner_people::Query(app.state.clone())
        .find_many(cook_ids.into_iter().collect())
        .await?
        .into_iter()
        .map(|person| (person.id, person.name))
        .collect::<HashMap<_, _>>();

    let summary = days
        .into_iter()
        .map(|day| SummaryDay {
            date: day.date,
            day_of_week: day.day_of_week,
            plan_id: day.plan_id,
            notes: day.notes,
            entries: day
                .entries
                .into_iter()
                .map(|entry| SummaryEntry {
                    meal_title: titles.get(&entry.meal_id).cloned(),
                    cook_name: entry
                        .assigned_cook_id
                        .as_ref()
                        .and_then(|id| names.get(id).cloned()),
                    entry,
                })
                .collect(),
        })
        .collect();

    Ok(Json(summary))
}
