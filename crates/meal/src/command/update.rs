use mealplanner_db::table::Meal as MealTable;
use mealplanner_shared::meal::Meal;
use sea_query::{Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use validator::Validate;

use super::MealInput;

impl super::Command {
    /// Replaces every field of the meal.
    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: impl Into<String> + std::fmt::Debug,
        input: MealInput,
    ) -> mealplanner_shared::Result<Meal> {
        let input = input.normalize();
        input.validate()?;

        let meal = input.into_meal(id.into());
        let statement = sea_query::Query::update()
            .table(MealTable::Table)
            .value(MealTable::Title, &meal.title)
            .value(MealTable::Description, meal.description.to_owned())
            .value(
                MealTable::Ingredients,
                serde_json::to_string(&meal.ingredients)?,
            )
            .value(MealTable::PrepTimeMinutes, meal.prep_time_minutes)
            .value(MealTable::CookTimeMinutes, meal.cook_time_minutes)
            .value(MealTable::Effort, meal.effort.to_string())
            .value(MealTable::ImageUrl, meal.image_url.to_owned())
            .and_where(Expr::col(MealTable::Id).eq(&meal.id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await?;

        if result.rows_affected() == 0 {
            mealplanner_shared::not_found!("meal {}", meal.id);
        }

        tracing::info!(meal_id = %meal.id, "meal updated");

        Ok(meal)
    }
}
