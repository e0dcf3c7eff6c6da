use std::collections::HashMap;

use mealplanner_shared::{meal::Meal, mealplan::PlanEntry, shopping::ShoppingListItem};
use serde::Deserialize;
use strum::{Display, EnumString};

use crate::quantity;

/// Order of the lines of a shopping list.
#[derive(EnumString, Display, Default, Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    /// Order in which ingredients were first met.
    #[default]
    Insertion,
    Name,
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Collapses the ingredients of `meals` into one line per name and unit.
///
/// Names merge case-insensitively; units are never converted, so `g` and
/// `cup` of the same ingredient stay on separate lines. The first spelling
/// seen is kept and lines come out in the order they were first seen.
pub fn reduce<'a>(meals: impl IntoIterator<Item = &'a Meal>) -> Vec<ShoppingListItem> {
    let mut items: Vec<ShoppingListItem> = vec![];
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for ingredient in meals.into_iter().flat_map(|meal| meal.ingredients.iter()) {
        let name = ingredient.name.trim();
        if name.is_empty() {
            continue;
        }

        let amount = quantity::amount(ingredient.quantity.as_ref());
        let key = (normalize(name), normalize(&ingredient.unit));

        match index.get(&key) {
            Some(&position) => items[position].total_quantity += amount,
            None => {
                index.insert(key, items.len());
                items.push(ShoppingListItem {
                    name: name.to_owned(),
                    total_quantity: amount,
                    display_quantity: String::new(),
                    unit: ingredient.unit.trim().to_owned(),
                });
            }
        }
    }

    for item in items.iter_mut() {
        item.display_quantity = quantity::format_quantity(item.total_quantity);
    }

    items
}

/// Reduces the meals behind `entries`, one contribution per entry. Entries
/// whose meal `lookup` cannot resolve are left out.
pub fn reduce_entries<'a, F>(entries: &[PlanEntry], lookup: F) -> Vec<ShoppingListItem>
where
    F: Fn(&str) -> Option<&'a Meal>,
{
    let meals = entries.iter().filter_map(|entry| {
        let meal = lookup(&entry.meal_id);
        if meal.is_none() {
            tracing::debug!(
                entry_id = %entry.id,
                meal_id = %entry.meal_id,
                "entry references a missing meal"
            );
        }
        meal
    });

    reduce(meals)
}

/// Case-insensitive name order, for displays that want it.
pub fn sort_by_name(items: &mut [ShoppingListItem]) {
    items.sort_by_cached_key(|item| (normalize(&item.name), normalize(&item.unit)));
}

pub fn sort_items(mut items: Vec<ShoppingListItem>, order: SortOrder) -> Vec<ShoppingListItem> {
    if order == SortOrder::Name {
        sort_by_name(&mut items);
    }

    items
}
