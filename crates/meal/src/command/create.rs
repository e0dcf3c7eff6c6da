use mealplanner_shared::meal::Meal;
use validator::Validate;

use super::{MealInput, insert_meal};

impl super::Command {
    #[tracing::instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: MealInput) -> mealplanner_shared::Result<Meal> {
        let input = input.normalize();
        input.validate()?;

        let meal = input.into_meal(mealplanner_shared::new_id());
        let mut conn = self.write_db.acquire().await?;
        insert_meal(&mut conn, &meal).await?;

        tracing::info!(meal_id = %meal.id, "meal created");

        Ok(meal)
    }
}
