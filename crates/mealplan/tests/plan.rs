use std::collections::BTreeMap;

use mealplanner_mealplan::{AddEntryInput, Command, Query, UpdateEntryInput};
use mealplanner_shared::mealplan::{DayOfWeek, MealType, PlanEntry};
use temp_dir::TempDir;
use time::{Weekday, macros::date};

mod helpers;

fn add(day: DayOfWeek, meal_id: &str, display_order: Option<i64>) -> AddEntryInput {
    AddEntryInput {
        day_of_week: day,
        meal_id: meal_id.to_owned(),
        meal_type: None,
        assigned_cook_id: None,
        display_order,
    }
}

fn day_meals(entries: &[PlanEntry], day: DayOfWeek) -> Vec<(String, i64)> {
    let mut entries = entries
        .iter()
        .filter(|e| e.day_of_week == day)
        .cloned()
        .collect::<Vec<_>>();
    mealplanner_mealplan::sort_entries(&mut entries);

    entries
        .into_iter()
        .map(|e| (e.meal_id, e.display_order))
        .collect()
}

#[tokio::test]
async fn test_get_or_create_for_week() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = Command(state.clone());

    let plan = command
        .get_or_create_for_week(date!(2025 - 02 - 12), Weekday::Saturday)
        .await?;
    assert_eq!(plan.week_start_date, date!(2025 - 02 - 08));
    assert!(plan.entries.is_empty());

    let again = command
        .get_or_create_for_week(date!(2025 - 02 - 08), Weekday::Saturday)
        .await?;
    assert_eq!(again.id, plan.id);

    let monday = command
        .get_or_create_for_week(date!(2025 - 02 - 12), Weekday::Monday)
        .await?;
    assert_eq!(monday.week_start_date, date!(2025 - 02 - 10));

    let all = Query(state).all().await?;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].week_start_date, date!(2025 - 02 - 10));

    Ok(())
}

#[tokio::test]
async fn test_add_entry_places_and_reindexes() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    for id in ["m1", "m2", "m3", "m4"] {
        helpers::insert_meal(&state, id, id).await?;
    }
    let command = Command(state.clone());
    let plan = command
        .get_or_create_for_week(date!(2025 - 02 - 08), Weekday::Saturday)
        .await?;

    command.add_entry(&plan.id, add(DayOfWeek::Monday, "m1", None)).await?;
    command.add_entry(&plan.id, add(DayOfWeek::Monday, "m2", None)).await?;
    command.add_entry(&plan.id, add(DayOfWeek::Monday, "m3", None)).await?;
    let inserted = command
        .add_entry(&plan.id, add(DayOfWeek::Monday, "m4", Some(1)))
        .await?;
    assert_eq!(inserted.display_order, 1);

    let plan = Query(state).find(&plan.id).await?.expect("plan");
    assert_eq!(
        day_meals(&plan.entries, DayOfWeek::Monday),
        vec![
            ("m1".to_owned(), 0),
            ("m4".to_owned(), 1),
            ("m2".to_owned(), 2),
            ("m3".to_owned(), 3),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_add_entry_unknown_references() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    helpers::insert_meal(&state, "m1", "Soup").await?;
    let command = Command(state);
    let plan = command
        .get_or_create_for_week(date!(2025 - 02 - 08), Weekday::Saturday)
        .await?;

    let missing_meal = command
        .add_entry(&plan.id, add(DayOfWeek::Monday, "nope", None))
        .await;
    assert!(matches!(missing_meal, Err(mealplanner_shared::Error::NotFound(_))));

    let mut input = add(DayOfWeek::Monday, "m1", None);
    input.assigned_cook_id = Some("nobody".to_owned());
    let missing_cook = command.add_entry(&plan.id, input).await;
    assert!(matches!(missing_cook, Err(mealplanner_shared::Error::NotFound(_))));

    let missing_plan = command
        .add_entry("nope", add(DayOfWeek::Monday, "m1", None))
        .await;
    assert!(matches!(missing_plan, Err(mealplanner_shared::Error::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_update_entry_moves_between_days() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    for id in ["m1", "m2", "m3", "m4"] {
        helpers::insert_meal(&state, id, id).await?;
    }
    helpers::insert_person(&state, "p1", "Alex").await?;
    let command = Command(state.clone());
    let plan = command
        .get_or_create_for_week(date!(2025 - 02 - 08), Weekday::Saturday)
        .await?;

    command.add_entry(&plan.id, add(DayOfWeek::Monday, "m1", None)).await?;
    let moving = command
        .add_entry(&plan.id, add(DayOfWeek::Monday, "m2", None))
        .await?;
    command.add_entry(&plan.id, add(DayOfWeek::Monday, "m3", None)).await?;
    command.add_entry(&plan.id, add(DayOfWeek::Friday, "m4", None)).await?;

    let updated = command
        .update_entry(
            &moving.id,
            UpdateEntryInput {
                day_of_week: Some(DayOfWeek::Friday),
                display_order: Some(0),
                assigned_cook_id: Some(Some("p1".to_owned())),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.day_of_week, DayOfWeek::Friday);
    assert_eq!(updated.display_order, 0);
    assert_eq!(updated.assigned_cook_id.as_deref(), Some("p1"));

    let plan = Query(state).find(&plan.id).await?.expect("plan");
    assert_eq!(
        day_meals(&plan.entries, DayOfWeek::Monday),
        vec![("m1".to_owned(), 0), ("m3".to_owned(), 1)]
    );
    assert_eq!(
        day_meals(&plan.entries, DayOfWeek::Friday),
        vec![("m2".to_owned(), 0), ("m4".to_owned(), 1)]
    );

    Ok(())
}

#[tokio::test]
async fn test_update_entry_keeps_omitted_fields() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    helpers::insert_meal(&state, "m1", "Soup").await?;
    helpers::insert_person(&state, "p1", "Alex").await?;
    let command = Command(state.clone());
    let plan = command
        .get_or_create_for_week(date!(2025 - 02 - 08), Weekday::Saturday)
        .await?;

    let entry = command
        .add_entry(
            &plan.id,
            AddEntryInput {
                meal_type: Some(MealType::Dinner),
                assigned_cook_id: Some("p1".to_owned()),
                ..add(DayOfWeek::Monday, "m1", None)
            },
        )
        .await?;

    let moved = command
        .update_entry(
            &entry.id,
            UpdateEntryInput {
                day_of_week: Some(DayOfWeek::Friday),
                display_order: Some(0),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(moved.day_of_week, DayOfWeek::Friday);
    assert_eq!(moved.assigned_cook_id.as_deref(), Some("p1"));
    assert_eq!(moved.meal_type, Some(MealType::Dinner));

    let stored = Query(state).find_entry(&entry.id).await?.expect("entry");
    assert_eq!(stored.assigned_cook_id.as_deref(), Some("p1"));
    assert_eq!(stored.meal_type, Some(MealType::Dinner));

    let input: UpdateEntryInput = serde_json::from_str(r#"{"assignedCookId": null}"#)?;
    let cleared = command.update_entry(&entry.id, input).await?;
    assert_eq!(cleared.assigned_cook_id, None);
    assert_eq!(cleared.meal_type, Some(MealType::Dinner));

    Ok(())
}

#[tokio::test]
async fn test_update_entry_keeps_position_without_order() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    for id in ["m1", "m2", "m3"] {
        helpers::insert_meal(&state, id, id).await?;
    }
    let command = Command(state.clone());
    let plan = command
        .get_or_create_for_week(date!(2025 - 02 - 08), Weekday::Saturday)
        .await?;

    command.add_entry(&plan.id, add(DayOfWeek::Sunday, "m1", None)).await?;
    let second = command
        .add_entry(&plan.id, add(DayOfWeek::Sunday, "m2", None))
        .await?;

    let updated = command
        .update_entry(
            &second.id,
            UpdateEntryInput {
                meal_id: Some("m3".to_owned()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.display_order, 1);
    assert_eq!(updated.meal_id, "m3");

    let plan = Query(state).find(&plan.id).await?.expect("plan");
    assert_eq!(
        day_meals(&plan.entries, DayOfWeek::Sunday),
        vec![("m1".to_owned(), 0), ("m3".to_owned(), 1)]
    );

    Ok(())
}

#[tokio::test]
async fn test_delete_entry_closes_gap() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    for id in ["m1", "m2", "m3"] {
        helpers::insert_meal(&state, id, id).await?;
    }
    let command = Command(state.clone());
    let plan = command
        .get_or_create_for_week(date!(2025 - 02 - 08), Weekday::Saturday)
        .await?;

    let first = command
        .add_entry(&plan.id, add(DayOfWeek::Tuesday, "m1", None))
        .await?;
    command.add_entry(&plan.id, add(DayOfWeek::Tuesday, "m2", None)).await?;
    command.add_entry(&plan.id, add(DayOfWeek::Tuesday, "m3", None)).await?;

    command.delete_entry(&first.id).await?;

    let query = Query(state);
    assert!(query.find_entry(&first.id).await?.is_none());
    let plan = query.find(&plan.id).await?.expect("plan");
    assert_eq!(
        day_meals(&plan.entries, DayOfWeek::Tuesday),
        vec![("m2".to_owned(), 0), ("m3".to_owned(), 1)]
    );

    let again = command.delete_entry(&first.id).await;
    assert!(matches!(again, Err(mealplanner_shared::Error::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_update_day_notes_replaces_map() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = Command(state.clone());
    let plan = command
        .get_or_create_for_week(date!(2025 - 02 - 08), Weekday::Saturday)
        .await?;

    let mut notes = BTreeMap::new();
    notes.insert(DayOfWeek::Monday, "Soccer".to_owned());
    notes.insert(DayOfWeek::Tuesday, "Leftovers".to_owned());
    command.update_day_notes(&plan.id, notes).await?;

    let mut notes = BTreeMap::new();
    notes.insert(DayOfWeek::Friday, "Pizza night".to_owned());
    notes.insert(DayOfWeek::Sunday, "  ".to_owned());
    let plan = command.update_day_notes(&plan.id, notes).await?;

    assert_eq!(plan.day_notes.len(), 1);
    assert_eq!(
        plan.day_notes.get(&DayOfWeek::Friday).map(String::as_str),
        Some("Pizza night")
    );

    let missing = command.update_day_notes("nope", BTreeMap::new()).await;
    assert!(matches!(missing, Err(mealplanner_shared::Error::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_filter_between_and_resolve_range() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    for id in ["m1", "m2", "m3"] {
        helpers::insert_meal(&state, id, id).await?;
    }
    let command = Command(state.clone());

    let week = command
        .get_or_create_for_week(date!(2025 - 02 - 08), Weekday::Saturday)
        .await?;
    command.add_entry(&week.id, add(DayOfWeek::Saturday, "m1", None)).await?;
    command.add_entry(&week.id, add(DayOfWeek::Monday, "m2", None)).await?;

    let later = command
        .get_or_create_for_week(date!(2025 - 03 - 01), Weekday::Saturday)
        .await?;
    command.add_entry(&later.id, add(DayOfWeek::Saturday, "m3", None)).await?;

    let plans = Query(state)
        .filter_between(date!(2025 - 02 - 08), date!(2025 - 02 - 14))
        .await?;
    assert_eq!(plans.len(), 1);

    let days =
        mealplanner_mealplan::resolve_range(date!(2025 - 02 - 08), date!(2025 - 02 - 14), &plans)?;
    let filled = days
        .iter()
        .enumerate()
        .filter(|(_, day)| !day.entries.is_empty())
        .map(|(offset, day)| (offset, day.entries[0].meal_id.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(filled, vec![(0, "m1"), (2, "m2")]);

    Ok(())
}
