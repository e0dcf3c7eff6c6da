use std::ops::Deref;

use mealplanner_db::table::Person as PersonTable;
use mealplanner_shared::person::Person;
use sea_query::{Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use validator::Validate;

use crate::PersonInput;

#[derive(Clone)]
pub struct Command(pub mealplanner_shared::State);

impl Deref for Command {
    type Target = mealplanner_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, input: PersonInput) -> mealplanner_shared::Result<Person> {
        let input = input.normalize();
        input.validate()?;

        let person = input.into_person(mealplanner_shared::new_id());
        let statement = sea_query::Query::insert()
            .into_table(PersonTable::Table)
            .columns([
                PersonTable::Id,
                PersonTable::Name,
                PersonTable::EatingPreferences,
                PersonTable::CookingPreferences,
            ])
            .values_panic([
                person.id.to_owned().into(),
                person.name.to_owned().into(),
                person.eating_preferences.to_owned().into(),
                person.cooking_preferences.to_owned().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        tracing::info!(person_id = %person.id, "person created");

        Ok(person)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        id: impl Into<String> + std::fmt::Debug,
        input: PersonInput,
    ) -> mealplanner_shared::Result<Person> {
        let input = input.normalize();
        input.validate()?;

        let person = input.into_person(id);
        let statement = sea_query::Query::update()
            .table(PersonTable::Table)
            .value(PersonTable::Name, &person.name)
            .value(
                PersonTable::EatingPreferences,
                person.eating_preferences.to_owned(),
            )
            .value(
                PersonTable::CookingPreferences,
                person.cooking_preferences.to_owned(),
            )
            .and_where(Expr::col(PersonTable::Id).eq(&person.id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            mealplanner_shared::not_found!("person {}", person.id);
        }

        tracing::info!(person_id = %person.id, "person updated");

        Ok(person)
    }

    /// Removes the person. Entries they were cooking lose their cook and
    /// their ratings are deleted.
    #[tracing::instrument(skip(self))]
    pub async fn delete(
        &self,
        id: impl Into<String> + std::fmt::Debug,
    ) -> mealplanner_shared::Result<()> {
        let id = id.into();
        let statement = sea_query::Query::delete()
            .from_table(PersonTable::Table)
            .and_where(Expr::col(PersonTable::Id).eq(&id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            mealplanner_shared::not_found!("person {id}");
        }

        tracing::info!(person_id = %id, "person deleted");

        Ok(())
    }
}
