use mealplanner_shared::mealplan::DayOfWeek;
use time::{Date, Duration, Weekday, format_description::BorrowedFormatItem, macros::format_description};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: Date, end: Date },

    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("date arithmetic overflowed")]
    Overflow,
}

/// Returns the most recent `anchor` on or before `date`.
pub fn week_anchor(date: Date, anchor: Weekday) -> Date {
    let days_back = (date.weekday().number_days_from_monday() + 7
        - anchor.number_days_from_monday())
        % 7;

    // At most 6 days back, only fails at the very first representable week.
    date.checked_sub(Duration::days(days_back.into()))
        .unwrap_or(Date::MIN)
}

pub fn add_days(date: Date, n: i64) -> Result<Date, CalendarError> {
    date.checked_add(Duration::days(n))
        .ok_or(CalendarError::Overflow)
}

pub fn days_between(from: Date, to: Date) -> i64 {
    (to - from).whole_days()
}

pub fn parse_date(value: &str) -> Result<Date, CalendarError> {
    Date::parse(value.trim(), DATE_FORMAT)
        .map_err(|_| CalendarError::InvalidDate(value.to_owned()))
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Inclusive range of calendar days, `start..=end`.
pub fn date_range(start: Date, end: Date) -> Result<DateRange, CalendarError> {
    if start > end {
        return Err(CalendarError::InvalidRange { start, end });
    }

    Ok(DateRange { start, end })
}

/// The 7 days of the week starting at `week_start`, labelled in the order
/// the plan was anchored.
pub fn week_days(week_start: Date) -> [(Date, DayOfWeek); 7] {
    let mut days = [(week_start, DayOfWeek::of(week_start)); 7];
    let mut date = week_start;

    for day in days.iter_mut().skip(1) {
        match date.next_day() {
            Some(next) => date = next,
            None => break,
        }
        *day = (date, DayOfWeek::of(date));
    }

    days
}

/// Lazy and restartable: iterating a `&DateRange` (or a clone) starts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn len(&self) -> usize {
        days_between(self.start, self.end) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn iter(&self) -> DateRangeIter {
        DateRangeIter {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for DateRange {
    type Item = Date;
    type IntoIter = DateRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &DateRange {
    type Item = Date;
    type IntoIter = DateRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct DateRangeIter {
    next: Option<Date>,
    end: Date,
}

impl Iterator for DateRangeIter {
    type Item = Date;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current < self.end {
            current.next_day()
        } else {
            None
        };

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self
            .next
            .map(|next| days_between(next, self.end) as usize + 1)
            .unwrap_or(0);

        (len, Some(len))
    }
}

impl ExactSizeIterator for DateRangeIter {}

impl std::iter::FusedIterator for DateRangeIter {}
