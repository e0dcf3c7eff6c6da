use std::{collections::BTreeMap, ops::Deref};

use mealplanner_db::table::{MealPlan, MealPlanEntry};
use mealplanner_shared::mealplan::{DayOfWeek, MealType, PlanEntry, WeeklyPlan};
use sea_query::{Expr, ExprTrait, Order, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, prelude::FromRow};
use time::Date;

use crate::calendar;

#[derive(Clone)]
pub struct Query(pub mealplanner_shared::State);

impl Deref for Query {
    type Target = mealplanner_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(FromRow)]
pub struct PlanRow {
    pub id: String,
    pub week_start_date: String,
    pub day_notes: sqlx::types::Json<BTreeMap<String, String>>,
}

#[derive(Default, FromRow)]
pub struct EntryRow {
    pub id: String,
    pub meal_plan_id: String,
    pub day_of_week: String,
    pub meal_id: String,
    pub meal_type: Option<String>,
    pub assigned_cook_id: Option<String>,
    pub display_order: i64,
}

impl EntryRow {
    /// `None` when the stored day label is not one of the seven.
    pub fn into_entry(self) -> Option<PlanEntry> {
        let Ok(day_of_week) = self.day_of_week.parse::<DayOfWeek>() else {
            tracing::warn!(
                entry_id = %self.id,
                day_of_week = %self.day_of_week,
                "skipping entry with unknown day label"
            );
            return None;
        };

        Some(PlanEntry {
            id: self.id,
            plan_id: self.meal_plan_id,
            day_of_week,
            meal_id: self.meal_id,
            meal_type: self
                .meal_type
                .and_then(|value| value.parse::<MealType>().ok()),
            assigned_cook_id: self.assigned_cook_id,
            display_order: self.display_order,
        })
    }
}

impl PlanRow {
    pub fn into_plan(self, entries: Vec<PlanEntry>) -> anyhow::Result<WeeklyPlan> {
        let week_start_date = calendar::parse_date(&self.week_start_date)?;
        let day_notes = self
            .day_notes
            .0
            .into_iter()
            .filter_map(|(day, notes)| day.parse::<DayOfWeek>().ok().map(|day| (day, notes)))
            .collect();

        Ok(WeeklyPlan {
            id: self.id,
            week_start_date,
            entries,
            day_notes,
        })
    }
}

fn select_plans() -> SelectStatement {
    sea_query::Query::select()
        .columns([MealPlan::Id, MealPlan::WeekStartDate, MealPlan::DayNotes])
        .from(MealPlan::Table)
        .to_owned()
}

fn select_entries() -> SelectStatement {
    sea_query::Query::select()
        .columns([
            MealPlanEntry::Id,
            MealPlanEntry::MealPlanId,
            MealPlanEntry::DayOfWeek,
            MealPlanEntry::MealId,
            MealPlanEntry::MealType,
            MealPlanEntry::AssignedCookId,
            MealPlanEntry::DisplayOrder,
        ])
        .from(MealPlanEntry::Table)
        .order_by(MealPlanEntry::DisplayOrder, Order::Asc)
        .order_by(MealPlanEntry::Id, Order::Asc)
        .to_owned()
}

/// Entries of one day of a plan, in display order.
pub(crate) async fn find_day_entries(
    conn: &mut SqliteConnection,
    plan_id: &str,
    day: DayOfWeek,
) -> anyhow::Result<Vec<PlanEntry>> {
    let statement = select_entries()
        .and_where(Expr::col(MealPlanEntry::MealPlanId).eq(plan_id))
        .and_where(Expr::col(MealPlanEntry::DayOfWeek).eq(day.to_string()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, EntryRow, _>(&sql, values)
        .fetch_all(conn)
        .await?;

    Ok(rows.into_iter().filter_map(EntryRow::into_entry).collect())
}

pub(crate) async fn find_entry(
    conn: &mut SqliteConnection,
    entry_id: &str,
) -> anyhow::Result<Option<PlanEntry>> {
    let statement = select_entries()
        .and_where(Expr::col(MealPlanEntry::Id).eq(entry_id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, EntryRow, _>(&sql, values)
        .fetch_optional(conn)
        .await?;

    Ok(row.and_then(EntryRow::into_entry))
}

impl Query {
    pub async fn find(&self, id: impl Into<String>) -> anyhow::Result<Option<WeeklyPlan>> {
        let id = id.into();
        let statement = select_plans()
            .and_where(Expr::col(MealPlan::Id).eq(&id))
            .limit(1)
            .to_owned();

        Ok(self.load(statement).await?.pop())
    }

    pub async fn find_by_week_start(&self, week_start: Date) -> anyhow::Result<Option<WeeklyPlan>> {
        let statement = select_plans()
            .and_where(Expr::col(MealPlan::WeekStartDate).eq(calendar::format_date(week_start)))
            .limit(1)
            .to_owned();

        Ok(self.load(statement).await?.pop())
    }

    /// All plans, most recent week first.
    pub async fn all(&self) -> anyhow::Result<Vec<WeeklyPlan>> {
        let statement = select_plans()
            .order_by(MealPlan::WeekStartDate, Order::Desc)
            .to_owned();

        self.load(statement).await
    }

    /// Plans whose week window intersects `start..=end`, oldest week first.
    pub async fn filter_between(&self, start: Date, end: Date) -> anyhow::Result<Vec<WeeklyPlan>> {
        let from = calendar::add_days(start, -6)?;
        let statement = select_plans()
            .and_where(Expr::col(MealPlan::WeekStartDate).between(
                calendar::format_date(from),
                calendar::format_date(end),
            ))
            .order_by(MealPlan::WeekStartDate, Order::Asc)
            .to_owned();

        self.load(statement).await
    }

    pub async fn find_entry(&self, entry_id: impl Into<String>) -> anyhow::Result<Option<PlanEntry>> {
        let entry_id = entry_id.into();
        let mut conn = self.read_db.acquire().await?;

        find_entry(&mut conn, &entry_id).await
    }

    async fn load(&self, statement: SelectStatement) -> anyhow::Result<Vec<WeeklyPlan>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, PlanRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        if rows.is_empty() {
            return Ok(vec![]);
        }

        let ids = rows.iter().map(|row| row.id.to_owned()).collect::<Vec<_>>();
        let statement = select_entries()
            .and_where(Expr::col(MealPlanEntry::MealPlanId).is_in(ids))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let entries = sqlx::query_as_with::<_, EntryRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let mut by_plan: BTreeMap<String, Vec<PlanEntry>> = BTreeMap::new();
        for entry in entries.into_iter().filter_map(EntryRow::into_entry) {
            by_plan
                .entry(entry.plan_id.to_owned())
                .or_default()
                .push(entry);
        }

        rows.into_iter()
            .map(|row| {
                let entries = by_plan.remove(&row.id).unwrap_or_default();
                row.into_plan(entries)
            })
            .collect()
    }
}
