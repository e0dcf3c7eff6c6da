use mealplanner_db::table::Meal as MealTable;
use sea_query::{Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

impl super::Command {
    /// Removes the meal; its plan entries and ratings go with it.
    #[tracing::instrument(skip(self))]
    pub async fn delete(
        &self,
        id: impl Into<String> + std::fmt::Debug,
    ) -> mealplanner_shared::Result<()> {
        let id = id.into();
        let statement = sea_query::Query::delete()
            .from_table(MealTable::Table)
            .and_where(Expr::col(MealTable::Id).eq(&id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            mealplanner_shared::not_found!("meal {id}");
        }

        tracing::info!(meal_id = %id, "meal deleted");

        Ok(())
    }
}
