use mealplanner_shared::mealplan::{DayOfWeek, PlanEntry};

/// Resulting lists of a cross-day move.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub source: Vec<PlanEntry>,
    pub destination: Vec<PlanEntry>,
}

/// Rewrites `display_order` as the 0-based position of each entry.
pub fn reindex(entries: &mut [PlanEntry]) {
    for (position, entry) in entries.iter_mut().enumerate() {
        entry.display_order = position as i64;
    }
}

/// Puts `moving` at `target_index` of the day's ordered list.
///
/// `current` must already be in display order. When `moving` is part of it,
/// it is taken out first; the index is clamped to the resulting length.
pub fn place(
    target_day: DayOfWeek,
    target_index: i64,
    mut moving: PlanEntry,
    current: &[PlanEntry],
) -> Vec<PlanEntry> {
    let mut entries = current
        .iter()
        .filter(|entry| entry.id != moving.id)
        .cloned()
        .collect::<Vec<_>>();

    let index = target_index.clamp(0, entries.len() as i64) as usize;
    moving.day_of_week = target_day;
    entries.insert(index, moving);
    reindex(&mut entries);

    entries
}

/// Takes `entry_id` out of the day and closes the gap.
pub fn remove(entry_id: &str, current: &[PlanEntry]) -> Vec<PlanEntry> {
    let mut entries = current
        .iter()
        .filter(|entry| entry.id != entry_id)
        .cloned()
        .collect::<Vec<_>>();
    reindex(&mut entries);

    entries
}

/// Moves `moving` out of `source` and into `destination` at `target_index`.
pub fn move_entry(
    moving: PlanEntry,
    target_day: DayOfWeek,
    target_index: i64,
    source: &[PlanEntry],
    destination: &[PlanEntry],
) -> Placement {
    if moving.day_of_week == target_day {
        let destination = place(target_day, target_index, moving, destination);
        return Placement {
            source: destination.clone(),
            destination,
        };
    }

    Placement {
        source: remove(&moving.id, source),
        destination: place(target_day, target_index, moving, destination),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, day: DayOfWeek, display_order: i64) -> PlanEntry {
        PlanEntry {
            id: id.to_owned(),
            plan_id: "plan".to_owned(),
            day_of_week: day,
            meal_id: format!("meal-{id}"),
            meal_type: None,
            assigned_cook_id: None,
            display_order,
        }
    }

    fn monday(ids: &[&str]) -> Vec<PlanEntry> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| entry(id, DayOfWeek::Monday, i as i64))
            .collect()
    }

    fn ids(entries: &[PlanEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    fn orders(entries: &[PlanEntry]) -> Vec<i64> {
        entries.iter().map(|e| e.display_order).collect()
    }

    #[test]
    fn test_place_new_entry_at_index() {
        let current = monday(&["a", "b", "c"]);
        let moving = entry("e", DayOfWeek::Monday, 99);

        let result = place(DayOfWeek::Monday, 2, moving, &current);

        assert_eq!(ids(&result), vec!["a", "b", "e", "c"]);
        assert_eq!(orders(&result), vec![0, 1, 2, 3]);
        assert_eq!(result[2].display_order, 2);
    }

    #[test]
    fn test_place_clamps_index() {
        let current = monday(&["a", "b"]);

        let end = place(DayOfWeek::Monday, 10, entry("e", DayOfWeek::Monday, 0), &current);
        let start = place(DayOfWeek::Monday, -3, entry("f", DayOfWeek::Monday, 0), &current);

        assert_eq!(ids(&end), vec!["a", "b", "e"]);
        assert_eq!(ids(&start), vec!["f", "a", "b"]);
        assert_eq!(orders(&start), vec![0, 1, 2]);
    }

    #[test]
    fn test_place_reorders_within_day() {
        let current = monday(&["a", "b", "c", "d"]);
        let moving = current[0].clone();

        let result = place(DayOfWeek::Monday, 2, moving, &current);

        assert_eq!(ids(&result), vec!["b", "c", "a", "d"]);
        assert_eq!(orders(&result), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_place_repairs_duplicate_orders() {
        let mut current = monday(&["a", "b", "c"]);
        for entry in current.iter_mut() {
            entry.display_order = 0;
        }

        let result = place(DayOfWeek::Monday, 0, entry("e", DayOfWeek::Monday, 0), &current);

        assert_eq!(orders(&result), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_move_between_days_leaves_no_gap() {
        let source = monday(&["a", "b", "c"]);
        let destination = vec![entry("x", DayOfWeek::Friday, 0)];

        let placement = move_entry(
            source[1].clone(),
            DayOfWeek::Friday,
            0,
            &source,
            &destination,
        );

        assert_eq!(ids(&placement.source), vec!["a", "c"]);
        assert_eq!(orders(&placement.source), vec![0, 1]);
        assert_eq!(ids(&placement.destination), vec!["b", "x"]);
        assert_eq!(orders(&placement.destination), vec![0, 1]);
        assert_eq!(placement.destination[0].day_of_week, DayOfWeek::Friday);
    }

    #[test]
    fn test_swap_is_two_placements() {
        let current = monday(&["a", "b"]);

        let once = place(DayOfWeek::Monday, 1, current[0].clone(), &current);
        assert_eq!(ids(&once), vec!["b", "a"]);

        let twice = place(DayOfWeek::Monday, 1, once[0].clone(), &once);
        assert_eq!(ids(&twice), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_reindexes() {
        let current = monday(&["a", "b", "c"]);

        let result = remove("a", &current);

        assert_eq!(ids(&result), vec!["b", "c"]);
        assert_eq!(orders(&result), vec![0, 1]);
    }

    #[test]
    fn test_remove_unknown_entry_keeps_day() {
        let current = monday(&["a", "b"]);

        assert_eq!(remove("zzz", &current), current);
    }
}
