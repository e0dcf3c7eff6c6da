use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::{Date, Weekday};

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn of(date: Date) -> Self {
        date.weekday().into()
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Monday => Self::Monday,
            Weekday::Tuesday => Self::Tuesday,
            Weekday::Wednesday => Self::Wednesday,
            Weekday::Thursday => Self::Thursday,
            Weekday::Friday => Self::Friday,
            Weekday::Saturday => Self::Saturday,
            Weekday::Sunday => Self::Sunday,
        }
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(value: DayOfWeek) -> Self {
        match value {
            DayOfWeek::Monday => Self::Monday,
            DayOfWeek::Tuesday => Self::Tuesday,
            DayOfWeek::Wednesday => Self::Wednesday,
            DayOfWeek::Thursday => Self::Thursday,
            DayOfWeek::Friday => Self::Friday,
            DayOfWeek::Saturday => Self::Saturday,
            DayOfWeek::Sunday => Self::Sunday,
        }
    }
}

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    pub id: String,
    pub plan_id: String,
    pub day_of_week: DayOfWeek,
    pub meal_id: String,
    #[serde(default)]
    pub meal_type: Option<MealType>,
    #[serde(default)]
    pub assigned_cook_id: Option<String>,
    #[serde(default)]
    pub display_order: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlan {
    pub id: String,
    pub week_start_date: Date,
    #[serde(default)]
    pub entries: Vec<PlanEntry>,
    #[serde(default)]
    pub day_notes: BTreeMap<DayOfWeek, String>,
}

impl WeeklyPlan {
    pub fn new(id: impl Into<String>, week_start_date: Date) -> Self {
        Self {
            id: id.into(),
            week_start_date,
            entries: vec![],
            day_notes: BTreeMap::new(),
        }
    }

    /// Entries of one day in stored order (not sorted).
    pub fn entries_on(&self, day: DayOfWeek) -> impl Iterator<Item = &PlanEntry> {
        self.entries.iter().filter(move |e| e.day_of_week == day)
    }
}
