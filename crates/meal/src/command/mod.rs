use std::ops::Deref;

use mealplanner_db::table::Meal as MealTable;
use mealplanner_shared::meal::{Effort, Ingredient, Meal, sanitize_ingredients};
use sea_query::SqliteQueryBuilder;
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::SqliteConnection;
use validator::Validate;

use crate::query::Query;

mod create;
mod delete;
mod import;
mod update;

pub use import::ImportResult;

#[derive(Clone)]
pub struct Command(pub mealplanner_shared::State);

impl Deref for Command {
    type Target = mealplanner_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    fn query(&self) -> Query {
        Query(self.0.clone())
    }
}

#[derive(Validate, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MealInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub prep_time_minutes: Option<u32>,
    #[serde(default)]
    pub cook_time_minutes: Option<u32>,
    #[serde(default)]
    pub effort: Option<Effort>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub image_url: Option<String>,
}

fn blank_as_none(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

impl MealInput {
    /// Trims text fields and drops unnamed ingredients, ready for validation.
    pub fn normalize(self) -> Self {
        Self {
            title: self.title.trim().to_owned(),
            description: blank_as_none(self.description),
            ingredients: sanitize_ingredients(self.ingredients),
            prep_time_minutes: self.prep_time_minutes,
            cook_time_minutes: self.cook_time_minutes,
            effort: self.effort,
            image_url: blank_as_none(self.image_url),
        }
    }

    pub(crate) fn into_meal(self, id: String) -> Meal {
        Meal {
            id,
            title: self.title,
            description: self.description,
            ingredients: self.ingredients,
            prep_time_minutes: self.prep_time_minutes,
            cook_time_minutes: self.cook_time_minutes,
            effort: self.effort.unwrap_or_default(),
            image_url: self.image_url,
        }
    }
}

pub(crate) async fn insert_meal(conn: &mut SqliteConnection, meal: &Meal) -> anyhow::Result<()> {
    let statement = sea_query::Query::insert()
        .into_table(MealTable::Table)
        .columns([
            MealTable::Id,
            MealTable::Title,
            MealTable::Description,
            MealTable::Ingredients,
            MealTable::PrepTimeMinutes,
            MealTable::CookTimeMinutes,
            MealTable::Effort,
            MealTable::ImageUrl,
        ])
        .values_panic([
            meal.id.to_owned().into(),
            meal.title.to_owned().into(),
            meal.description.to_owned().into(),
            serde_json::to_string(&meal.ingredients)?.into(),
            meal.prep_time_minutes.into(),
            meal.cook_time_minutes.into(),
            meal.effort.to_string().into(),
            meal.image_url.to_owned().into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}
