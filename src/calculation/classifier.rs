//! Work-time classification.
//!
//! Attendance records arrive already categorized by the scheduling system.
//! This module provides the classification contract that system relies on,
//! plus a calendar-based implementation.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::models::WorkTimeCategory;

/// Assigns a work-time category to the start of a schedule block.
pub trait WorkTimeClassifier {
    /// Classifies `timestamp` against a staff member's working window.
    fn classify(
        &self,
        timestamp: NaiveDateTime,
        work_start: NaiveTime,
        work_end: NaiveTime,
    ) -> WorkTimeCategory;
}

/// Classifies by calendar: holidays, then weekends, then the working window.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{CalendarClassifier, WorkTimeClassifier};
/// use payroll_engine::models::WorkTimeCategory;
/// use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
///
/// let classifier = CalendarClassifier::new([NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()]);
/// let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
/// let six = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
///
/// // 2025-03-03 is a substitute public holiday (Monday)
/// let holiday = NaiveDateTime::parse_from_str("2025-03-03 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(classifier.classify(holiday, nine, six), WorkTimeCategory::Holiday);
///
/// let tuesday = NaiveDateTime::parse_from_str("2025-03-04 19:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(classifier.classify(tuesday, nine, six), WorkTimeCategory::Outside);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarClassifier {
    holidays: BTreeSet<NaiveDate>,
}

impl CalendarClassifier {
    /// Creates a classifier with the given public holidays.
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Returns true if `date` is a listed public holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }
}

impl WorkTimeClassifier for CalendarClassifier {
    fn classify(
        &self,
        timestamp: NaiveDateTime,
        work_start: NaiveTime,
        work_end: NaiveTime,
    ) -> WorkTimeCategory {
        let date = timestamp.date();
        if self.is_holiday(date) {
            return WorkTimeCategory::Holiday;
        }
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return WorkTimeCategory::Weekend;
        }
        if within_window(timestamp.time(), work_start, work_end) {
            WorkTimeCategory::Inside
        } else {
            WorkTimeCategory::Outside
        }
    }
}

/// Half-open window check; a window whose end is not after its start wraps
/// past midnight.
fn within_window(time: NaiveTime, start: NaiveTime, end: NaiveTime) -> bool {
    if start < end {
        start <= time && time < end
    } else {
        time >= start || time < end
    }
}
