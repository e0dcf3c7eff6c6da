use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Index, IndexCreateStatement, IndexDropStatement,
    Table, TableCreateStatement, TableDropStatement,
};

use crate::table::{Meal, MealRating, Person};

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(MealRating::Table)
        .col(
            ColumnDef::new(MealRating::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(MealRating::MealId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(MealRating::PersonId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(ColumnDef::new(MealRating::Rating).integer().not_null())
        .col(ColumnDef::new(MealRating::Comment).string().string_len(1000))
        .col(
            ColumnDef::new(MealRating::RatedDate)
                .string()
                .not_null()
                .string_len(10),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_meal_rating_meal")
                .from(MealRating::Table, MealRating::MealId)
                .to(Meal::Table, Meal::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_meal_rating_person")
                .from(MealRating::Table, MealRating::PersonId)
                .to(Person::Table, Person::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(MealRating::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateIdx1;

fn create_idx_1() -> IndexCreateStatement {
    Index::create()
        .name("idx_meal_rating_meal_person")
        .table(MealRating::Table)
        .col(MealRating::MealId)
        .col(MealRating::PersonId)
        .unique()
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_meal_rating_meal_person")
        .table(MealRating::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
