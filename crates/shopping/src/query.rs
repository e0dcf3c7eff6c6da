use std::{
    collections::{BTreeSet, HashMap},
    ops::Deref,
};

use mealplanner_mealplan::calendar;
use mealplanner_shared::{
    meal::Meal, mealplan::PlanEntry, shopping::ShoppingListItem,
};
use time::Date;

use crate::{SortOrder, reduce_entries, sort_items};

#[derive(Clone)]
pub struct Query(pub mealplanner_shared::State);

impl Deref for Query {
    type Target = mealplanner_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Query {
    /// Shopping list of every entry of one weekly plan.
    #[tracing::instrument(skip(self))]
    pub async fn for_plan(
        &self,
        plan_id: impl Into<String> + std::fmt::Debug,
        sort: SortOrder,
    ) -> mealplanner_shared::Result<Vec<ShoppingListItem>> {
        let plan_id = plan_id.into();
        let plans = mealplanner_mealplan::Query(self.0.clone());

        let Some(plan) = plans.find(&plan_id).await? else {
            mealplanner_shared::not_found!("meal plan {plan_id}");
        };

        Ok(self.reduce(&plan.entries, sort).await?)
    }

    /// Shopping list of the entries resolved for each day of `start..=end`.
    #[tracing::instrument(skip(self))]
    pub async fn for_range(
        &self,
        start: Date,
        end: Date,
        sort: SortOrder,
    ) -> mealplanner_shared::Result<Vec<ShoppingListItem>> {
        let range = calendar::date_range(start, end)?;

        let plans = mealplanner_mealplan::Query(self.0.clone())
            .filter_between(range.start(), range.end())
            .await?;
        let entries = mealplanner_mealplan::entries_between(range.start(), range.end(), &plans)?;

        Ok(self.reduce(&entries, sort).await?)
    }

    async fn reduce(
        &self,
        entries: &[PlanEntry],
        sort: SortOrder,
    ) -> anyhow::Result<Vec<ShoppingListItem>> {
        let ids = entries
            .iter()
            .map(|entry| entry.meal_id.to_owned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();

        let meals = mealplanner_meal::Query(self.0.clone())
            .find_many(ids)
            .await?;
        let by_id = meals
            .iter()
            .map(|meal| (meal.id.as_str(), meal))
            .collect::<HashMap<&str, &Meal>>();

        let items = reduce_entries(entries, |id| by_id.get(id).copied());
        tracing::debug!(entries = entries.len(), items = items.len(), "shopping list reduced");

        Ok(sort_items(items, sort))
    }
}
