use std::{collections::BTreeMap, ops::Deref};

use mealplanner_db::table::{Meal, MealPlan, MealPlanEntry, Person};
use mealplanner_shared::mealplan::{DayOfWeek, MealType, PlanEntry, WeeklyPlan};
use sea_query::{Expr, ExprTrait, IntoColumnRef, IntoTableRef, OnConflict, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::SqliteConnection;
use time::{Date, Weekday};
use validator::Validate;

use crate::{
    calendar::{self, CalendarError},
    placement,
    query::{self, Query},
};

impl From<CalendarError> for mealplanner_shared::Error {
    fn from(value: CalendarError) -> Self {
        Self::Server(value.to_string())
    }
}

#[derive(Clone)]
pub struct Command(pub mealplanner_shared::State);

impl Deref for Command {
    type Target = mealplanner_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Validate, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddEntryInput {
    pub day_of_week: DayOfWeek,
    #[validate(length(min = 1))]
    pub meal_id: String,
    pub meal_type: Option<MealType>,
    pub assigned_cook_id: Option<String>,
    /// Target position in the day; appended when absent.
    pub display_order: Option<i64>,
}

#[derive(Validate, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryInput {
    #[validate(length(min = 1))]
    pub meal_id: Option<String>,
    pub day_of_week: Option<DayOfWeek>,
    /// Absent keeps the current value, `null` clears it.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub meal_type: Option<Option<MealType>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub assigned_cook_id: Option<Option<String>>,
    pub display_order: Option<i64>,
}

impl Command {
    fn query(&self) -> Query {
        Query(self.0.clone())
    }

    /// Plan whose week (starting on `anchor`) contains `date`, created empty
    /// when missing.
    #[tracing::instrument(skip(self))]
    pub async fn get_or_create_for_week(
        &self,
        date: Date,
        anchor: Weekday,
    ) -> mealplanner_shared::Result<WeeklyPlan> {
        let week_start = calendar::week_anchor(date, anchor);

        if let Some(plan) = self.query().find_by_week_start(week_start).await? {
            return Ok(plan);
        }

        let statement = sea_query::Query::insert()
            .into_table(MealPlan::Table)
            .columns([MealPlan::Id, MealPlan::WeekStartDate, MealPlan::DayNotes])
            .values_panic([
                mealplanner_shared::new_id().into(),
                calendar::format_date(week_start).into(),
                "{}".into(),
            ])
            .on_conflict(
                OnConflict::column(MealPlan::WeekStartDate)
                    .do_nothing()
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        tracing::info!(week_start = %week_start, "meal plan created");

        match self.query().find_by_week_start(week_start).await? {
            Some(plan) => Ok(plan),
            None => mealplanner_shared::bail!("meal plan for {week_start} could not be created"),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_entry(
        &self,
        plan_id: impl Into<String> + std::fmt::Debug,
        input: AddEntryInput,
    ) -> mealplanner_shared::Result<PlanEntry> {
        input.validate()?;
        let plan_id = plan_id.into();

        let mut tx = self.write_db.begin().await?;
        if !exists(&mut tx, MealPlan::Table, MealPlan::Id, &plan_id).await? {
            mealplanner_shared::not_found!("meal plan {plan_id}");
        }
        ensure_references(&mut tx, Some(&input.meal_id), input.assigned_cook_id.as_deref())
            .await?;

        let entry = PlanEntry {
            id: mealplanner_shared::new_id(),
            plan_id: plan_id.to_owned(),
            day_of_week: input.day_of_week,
            meal_id: input.meal_id,
            meal_type: input.meal_type,
            assigned_cook_id: input.assigned_cook_id,
            display_order: 0,
        };

        let current = query::find_day_entries(&mut tx, &plan_id, input.day_of_week).await?;
        let target_index = input.display_order.unwrap_or(current.len() as i64);
        let day = placement::place(input.day_of_week, target_index, entry.clone(), &current);

        let Some(entry) = day.iter().find(|e| e.id == entry.id).cloned() else {
            mealplanner_shared::bail!("entry lost during placement");
        };

        insert_entry(&mut tx, &entry).await?;
        write_orders(&mut tx, &day).await?;
        tx.commit().await?;

        tracing::info!(entry_id = %entry.id, plan_id = %entry.plan_id, "entry added");

        Ok(entry)
    }

    /// Changes only the fields present in `input`; a changed day or an
    /// explicit `display_order` goes through placement.
    #[tracing::instrument(skip(self))]
    pub async fn update_entry(
        &self,
        entry_id: impl Into<String> + std::fmt::Debug,
        input: UpdateEntryInput,
    ) -> mealplanner_shared::Result<PlanEntry> {
        input.validate()?;
        let entry_id = entry_id.into();

        let mut tx = self.write_db.begin().await?;
        let Some(current) = query::find_entry(&mut tx, &entry_id).await? else {
            mealplanner_shared::not_found!("meal plan entry {entry_id}");
        };
        ensure_references(
            &mut tx,
            input.meal_id.as_deref(),
            input.assigned_cook_id.as_ref().and_then(|cook| cook.as_deref()),
        )
        .await?;

        let source_day = current.day_of_week;
        let target_day = input.day_of_week.unwrap_or(source_day);

        let mut moving = current.clone();
        if let Some(meal_id) = input.meal_id {
            moving.meal_id = meal_id;
        }
        if let Some(meal_type) = input.meal_type {
            moving.meal_type = meal_type;
        }
        if let Some(assigned_cook_id) = input.assigned_cook_id {
            moving.assigned_cook_id = assigned_cook_id;
        }

        let source = query::find_day_entries(&mut tx, &current.plan_id, source_day).await?;
        let destination = if target_day == source_day {
            source.clone()
        } else {
            query::find_day_entries(&mut tx, &current.plan_id, target_day).await?
        };

        let target_index = match input.display_order {
            Some(index) => index,
            None if target_day == source_day => source
                .iter()
                .position(|e| e.id == moving.id)
                .unwrap_or(source.len()) as i64,
            None => destination.len() as i64,
        };

        let result = placement::move_entry(moving, target_day, target_index, &source, &destination);
        let Some(updated) = result.destination.iter().find(|e| e.id == entry_id).cloned() else {
            mealplanner_shared::bail!("entry lost during placement");
        };

        let statement = sea_query::Query::update()
            .table(MealPlanEntry::Table)
            .value(MealPlanEntry::MealId, &updated.meal_id)
            .value(MealPlanEntry::DayOfWeek, updated.day_of_week.to_string())
            .value(
                MealPlanEntry::MealType,
                updated.meal_type.map(|t| t.to_string()),
            )
            .value(
                MealPlanEntry::AssignedCookId,
                updated.assigned_cook_id.to_owned(),
            )
            .and_where(Expr::col(MealPlanEntry::Id).eq(&updated.id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if target_day != source_day {
            write_orders(&mut tx, &result.source).await?;
        }
        write_orders(&mut tx, &result.destination).await?;
        tx.commit().await?;

        tracing::info!(entry_id = %updated.id, day = %updated.day_of_week, "entry updated");

        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_entry(
        &self,
        entry_id: impl Into<String> + std::fmt::Debug,
    ) -> mealplanner_shared::Result<()> {
        let entry_id = entry_id.into();

        let mut tx = self.write_db.begin().await?;
        let Some(current) = query::find_entry(&mut tx, &entry_id).await? else {
            mealplanner_shared::not_found!("meal plan entry {entry_id}");
        };

        let day =
            query::find_day_entries(&mut tx, &current.plan_id, current.day_of_week).await?;
        let remaining = placement::remove(&entry_id, &day);

        let statement = sea_query::Query::delete()
            .from_table(MealPlanEntry::Table)
            .and_where(Expr::col(MealPlanEntry::Id).eq(&entry_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        write_orders(&mut tx, &remaining).await?;
        tx.commit().await?;

        tracing::info!(entry_id = %entry_id, "entry deleted");

        Ok(())
    }

    /// Replaces every note of the plan; blank notes are dropped.
    #[tracing::instrument(skip(self, notes))]
    pub async fn update_day_notes(
        &self,
        plan_id: impl Into<String> + std::fmt::Debug,
        notes: BTreeMap<DayOfWeek, String>,
    ) -> mealplanner_shared::Result<WeeklyPlan> {
        let plan_id = plan_id.into();
        let notes = notes
            .into_iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .collect::<BTreeMap<_, _>>();

        let statement = sea_query::Query::update()
            .table(MealPlan::Table)
            .value(MealPlan::DayNotes, serde_json::to_string(&notes)?)
            .and_where(Expr::col(MealPlan::Id).eq(&plan_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            mealplanner_shared::not_found!("meal plan {plan_id}");
        }

        match self.query().find(&plan_id).await? {
            Some(plan) => Ok(plan),
            None => mealplanner_shared::not_found!("meal plan {plan_id}"),
        }
    }
}

async fn exists<T, C>(
    conn: &mut SqliteConnection,
    table: T,
    id_column: C,
    id: &str,
) -> mealplanner_shared::Result<bool>
where
    T: IntoTableRef,
    C: IntoColumnRef + Clone,
{
    let statement = sea_query::Query::select()
        .column(id_column.clone())
        .from(table)
        .and_where(Expr::col(id_column).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_with(&sql, values).fetch_optional(conn).await?;

    Ok(row.is_some())
}

async fn ensure_references(
    conn: &mut SqliteConnection,
    meal_id: Option<&str>,
    cook_id: Option<&str>,
) -> mealplanner_shared::Result<()> {
    if let Some(meal_id) = meal_id {
        if !exists(conn, Meal::Table, Meal::Id, meal_id).await? {
            mealplanner_shared::not_found!("meal {meal_id}");
        }
    }

    if let Some(cook_id) = cook_id {
        if !exists(conn, Person::Table, Person::Id, cook_id).await? {
            mealplanner_shared::not_found!("person {cook_id}");
        }
    }

    Ok(())
}

async fn insert_entry(conn: &mut SqliteConnection, entry: &PlanEntry) -> anyhow::Result<()> {
    let statement = sea_query::Query::insert()
        .into_table(MealPlanEntry::Table)
        .columns([
            MealPlanEntry::Id,
            MealPlanEntry::MealPlanId,
            MealPlanEntry::DayOfWeek,
            MealPlanEntry::MealId,
            MealPlanEntry::MealType,
            MealPlanEntry::AssignedCookId,
            MealPlanEntry::DisplayOrder,
        ])
        .values_panic([
            entry.id.to_owned().into(),
            entry.plan_id.to_owned().into(),
            entry.day_of_week.to_string().into(),
            entry.meal_id.to_owned().into(),
            entry.meal_type.map(|t| t.to_string()).into(),
            entry.assigned_cook_id.to_owned().into(),
            entry.display_order.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

async fn write_orders(conn: &mut SqliteConnection, entries: &[PlanEntry]) -> anyhow::Result<()> {
    for entry in entries {
        let statement = sea_query::Query::update()
            .table(MealPlanEntry::Table)
            .value(MealPlanEntry::DisplayOrder, entry.display_order)
            .value(MealPlanEntry::DayOfWeek, entry.day_of_week.to_string())
            .and_where(Expr::col(MealPlanEntry::Id).eq(&entry.id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *conn).await?;
    }

    Ok(())
}
