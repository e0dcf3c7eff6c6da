use std::ops::Deref;

use mealplanner_db::table::Meal as MealTable;
use mealplanner_shared::meal::{Effort, Ingredient, Meal};
use sea_query::{Expr, ExprTrait, Order, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::prelude::FromRow;

use crate::catalog;

#[derive(Clone)]
pub struct Query(pub mealplanner_shared::State);

impl Deref for Query {
    type Target = mealplanner_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(FromRow)]
pub struct MealRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: sqlx::types::Json<Vec<Ingredient>>,
    pub prep_time_minutes: Option<i64>,
    pub cook_time_minutes: Option<i64>,
    pub effort: String,
    pub image_url: Option<String>,
}

impl From<MealRow> for Meal {
    fn from(row: MealRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            ingredients: row.ingredients.0,
            prep_time_minutes: row.prep_time_minutes.and_then(|v| u32::try_from(v).ok()),
            cook_time_minutes: row.cook_time_minutes.and_then(|v| u32::try_from(v).ok()),
            effort: row.effort.parse::<Effort>().unwrap_or_default(),
            image_url: row.image_url,
        }
    }
}

fn select_meals() -> SelectStatement {
    sea_query::Query::select()
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
        .from(MealTable::Table)
        .order_by(MealTable::Title, Order::Asc)
        .order_by(MealTable::Id, Order::Asc)
        .to_owned()
}

impl Query {
    /// Every meal ordered by title, optionally narrowed to titles containing
    /// `search`.
    pub async fn all(&self, search: Option<&str>) -> anyhow::Result<Vec<Meal>> {
        let meals = self.fetch(select_meals()).await?;

        Ok(match search {
            Some(search) => meals
                .into_iter()
                .filter(|meal| catalog::matches_search(&meal.title, search))
                .collect(),
            None => meals,
        })
    }

    pub async fn find(&self, id: impl Into<String>) -> anyhow::Result<Option<Meal>> {
        let id = id.into();
        let statement = select_meals()
            .and_where(Expr::col(MealTable::Id).eq(&id))
            .limit(1)
            .to_owned();

        Ok(self.fetch(statement).await?.pop())
    }

    pub async fn find_many(&self, ids: Vec<String>) -> anyhow::Result<Vec<Meal>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let statement = select_meals()
            .and_where(Expr::col(MealTable::Id).is_in(ids))
            .to_owned();

        self.fetch(statement).await
    }

    pub async fn titles(&self) -> anyhow::Result<Vec<String>> {
        let statement = sea_query::Query::select()
            .column(MealTable::Title)
            .from(MealTable::Table)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(rows.into_iter().map(|(title,)| title).collect())
    }

    async fn fetch(&self, statement: SelectStatement) -> anyhow::Result<Vec<Meal>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, MealRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(rows.into_iter().map(Meal::from).collect())
    }
}
