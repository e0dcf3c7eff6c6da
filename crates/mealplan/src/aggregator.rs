use mealplanner_shared::mealplan::{DayOfWeek, PlanEntry, WeeklyPlan};
use serde::Serialize;
use time::Date;

use crate::calendar::{self, CalendarError};

/// What a single calendar day holds once plans have been resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDay {
    pub date: Date,
    pub day_of_week: DayOfWeek,
    pub plan_id: Option<String>,
    pub entries: Vec<PlanEntry>,
    pub notes: Option<String>,
}

impl ResolvedDay {
    fn empty(date: Date) -> Self {
        Self {
            date,
            day_of_week: DayOfWeek::of(date),
            plan_id: None,
            entries: vec![],
            notes: None,
        }
    }
}

pub fn covers(plan: &WeeklyPlan, date: Date) -> bool {
    let offset = calendar::days_between(plan.week_start_date, date);

    (0..7).contains(&offset)
}

/// First plan whose 7-day window contains `date`.
pub fn covering_plan(date: Date, plans: &[WeeklyPlan]) -> Option<&WeeklyPlan> {
    let mut covering = plans.iter().filter(|plan| covers(plan, date));
    let first = covering.next()?;

    if let Some(other) = covering.next() {
        tracing::warn!(
            date = %date,
            plan_id = %first.id,
            overlapping_plan_id = %other.id,
            "overlapping plan windows, using the first one"
        );
    }

    Some(first)
}

/// Orders a day's entries by display order, then by id.
pub fn sort_entries(entries: &mut [PlanEntry]) {
    entries.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.id.cmp(&b.id))
    });
}

pub fn day_entries(plan: &WeeklyPlan, day: DayOfWeek) -> Vec<PlanEntry> {
    let mut entries = plan.entries_on(day).cloned().collect::<Vec<_>>();
    sort_entries(&mut entries);

    entries
}

pub fn resolve_day(date: Date, plans: &[WeeklyPlan]) -> ResolvedDay {
    let Some(plan) = covering_plan(date, plans) else {
        return ResolvedDay::empty(date);
    };

    // The label follows the offset within the plan's own week.
    let offset = calendar::days_between(plan.week_start_date, date) as usize;
    let (_, day) = calendar::week_days(plan.week_start_date)[offset];

    let notes = plan
        .day_notes
        .get(&day)
        .filter(|notes| !notes.trim().is_empty())
        .cloned();

    ResolvedDay {
        date,
        day_of_week: day,
        plan_id: Some(plan.id.to_owned()),
        entries: day_entries(plan, day),
        notes,
    }
}

pub fn resolve_range(
    start: Date,
    end: Date,
    plans: &[WeeklyPlan],
) -> Result<Vec<ResolvedDay>, CalendarError> {
    Ok(calendar::date_range(start, end)?
        .into_iter()
        .map(|date| resolve_day(date, plans))
        .collect())
}

/// Entries of every day in the range, day by day in resolved order.
pub fn entries_between(
    start: Date,
    end: Date,
    plans: &[WeeklyPlan],
) -> Result<Vec<PlanEntry>, CalendarError> {
    Ok(resolve_range(start, end, plans)?
        .into_iter()
        .flat_map(|day| day.entries)
        .collect())
}
