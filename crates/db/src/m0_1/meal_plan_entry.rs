use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Index, IndexCreateStatement, IndexDropStatement,
    Table, TableCreateStatement, TableDropStatement,
};

use crate::table::{Meal, MealPlan, MealPlanEntry, Person};

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(MealPlanEntry::Table)
        .col(
            ColumnDef::new(MealPlanEntry::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(MealPlanEntry::MealPlanId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(MealPlanEntry::DayOfWeek)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(
            ColumnDef::new(MealPlanEntry::MealId)
                .string()
                .not_null()
                .string_len(26),
        )
        .col(
            ColumnDef::new(MealPlanEntry::MealType)
                .string()
                .string_len(10),
        )
        .col(
            ColumnDef::new(MealPlanEntry::AssignedCookId)
                .string()
                .string_len(26),
        )
        .col(
            ColumnDef::new(MealPlanEntry::DisplayOrder)
                .integer()
                .not_null()
                .default(0),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_meal_plan_entry_meal_plan")
                .from(MealPlanEntry::Table, MealPlanEntry::MealPlanId)
                .to(MealPlan::Table, MealPlan::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_meal_plan_entry_meal")
                .from(MealPlanEntry::Table, MealPlanEntry::MealId)
                .to(Meal::Table, Meal::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_meal_plan_entry_cook")
                .from(MealPlanEntry::Table, MealPlanEntry::AssignedCookId)
                .to(Person::Table, Person::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(MealPlanEntry::Table).to_owned()
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
        .name("idx_meal_plan_entry_plan_day")
        .table(MealPlanEntry::Table)
        .col(MealPlanEntry::MealPlanId)
        .col(MealPlanEntry::DayOfWeek)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_meal_plan_entry_plan_day")
        .table(MealPlanEntry::Table)
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
