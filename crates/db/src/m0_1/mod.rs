mod meal;
mod meal_plan;
mod meal_plan_entry;
mod meal_rating;
mod person;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "mealplanner",
    "m0_1",
    vec_box![],
    vec_box![
        meal::CreateTable,
        person::CreateTable,
        meal_plan::CreateTable,
        meal_plan::CreateIdx1,
        meal_plan_entry::CreateTable,
        meal_plan_entry::CreateIdx1,
        meal_rating::CreateTable,
        meal_rating::CreateIdx1,
    ]
);
