use std::ops::Deref;

use mealplanner_db::table::Person as PersonTable;
use mealplanner_shared::person::Person;
use sea_query::{Expr, ExprTrait, Order, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::prelude::FromRow;

#[derive(Clone)]
pub struct Query(pub mealplanner_shared::State);

impl Deref for Query {
    type Target = mealplanner_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(FromRow)]
pub struct PersonRow {
    pub id: String,
    pub name: String,
    pub eating_preferences: Option<String>,
    pub cooking_preferences: Option<String>,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            eating_preferences: row.eating_preferences,
            cooking_preferences: row.cooking_preferences,
        }
    }
}

fn select_people() -> SelectStatement {
    sea_query::Query::select()
        .columns([
            PersonTable::Id,
            PersonTable::Name,
            PersonTable::EatingPreferences,
            PersonTable::CookingPreferences,
        ])
        .from(PersonTable::Table)
        .to_owned()
}

impl Query {
    /// Everyone in the household, by name.
    pub async fn all(&self) -> anyhow::Result<Vec<Person>> {
        let statement = select_people()
            .order_by(PersonTable::Name, Order::Asc)
            .order_by(PersonTable::Id, Order::Asc)
            .to_owned();

        self.fetch(statement).await
    }

    pub async fn find(&self, id: impl Into<String>) -> anyhow::Result<Option<Person>> {
        let id = id.into();
        let statement = select_people()
            .and_where(Expr::col(PersonTable::Id).eq(&id))
            .limit(1)
            .to_owned();

        Ok(self.fetch(statement).await?.pop())
    }

    pub async fn find_many(&self, ids: Vec<String>) -> anyhow::Result<Vec<Person>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let statement = select_people()
            .and_where(Expr::col(PersonTable::Id).is_in(ids))
            .to_owned();

        self.fetch(statement).await
    }

    async fn fetch(&self, statement: SelectStatement) -> anyhow::Result<Vec<Person>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, PersonRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(rows.into_iter().map(Person::from).collect())
    }
}
