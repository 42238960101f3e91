//! Monthly attendance statistics model.
//!
//! [`MonthlyAttendanceStatistics`] is derived fresh from one staff member's
//! locked records on every run; it is never patched incrementally.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{SessionStatus, SourceMetric};

/// Typed counters for one staff member over one month.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthlyAttendanceStatistics {
    /// Delivered PT sessions inside working hours.
    pub pt_inside: u32,
    /// Delivered PT sessions outside working hours.
    pub pt_outside: u32,
    /// Delivered PT sessions on weekends.
    pub pt_weekend: u32,
    /// Delivered PT sessions on public holidays.
    pub pt_holiday: u32,
    /// Delivered body challenge PT sessions; overlaps the PT buckets above.
    pub bc_count: u32,
    /// Delivered OT sessions without InBody.
    pub ot_plain: u32,
    /// Delivered OT sessions with InBody.
    pub ot_inbody: u32,
    /// Delivered consulting sessions.
    pub consulting_count: u32,
    /// Delivered GX classes.
    pub gx_count: u32,
    /// Personal time inside working hours.
    pub personal_inside_hours: Decimal,
    /// Personal time outside working hours, weekends and holidays included.
    pub personal_outside_hours: Decimal,
    /// Every PT record by completion outcome, delivered or not.
    #[serde(default)]
    pub pt_outcomes: BTreeMap<SessionStatus, u32>,
    /// Personal sales for the month, supplied by the caller. Reported
    /// alongside the counters; payroll reads the figure passed to
    /// [`compute_monthly_payroll`](crate::calculation::compute_monthly_payroll).
    #[serde(default)]
    pub personal_sales: Decimal,
}

impl MonthlyAttendanceStatistics {
    /// Total delivered PT sessions across all work-time buckets.
    pub fn total_pt(&self) -> u32 {
        self.pt_inside + self.pt_outside + self.pt_weekend + self.pt_holiday
    }

    /// Total delivered OT sessions.
    pub fn total_ot(&self) -> u32 {
        self.ot_plain + self.ot_inbody
    }

    /// Total personal time in hours.
    pub fn total_personal_hours(&self) -> Decimal {
        self.personal_inside_hours + self.personal_outside_hours
    }

    /// Returns the session count for a source metric.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{MonthlyAttendanceStatistics, SourceMetric};
    ///
    /// let stats = MonthlyAttendanceStatistics {
    ///     pt_inside: 10,
    ///     pt_weekend: 2,
    ///     ..Default::default()
    /// };
    /// assert_eq!(stats.metric(SourceMetric::PtInside), 10);
    /// assert_eq!(stats.metric(SourceMetric::PtTotal), 12);
    /// ```
    pub fn metric(&self, metric: SourceMetric) -> u32 {
        match metric {
            SourceMetric::PtInside => self.pt_inside,
            SourceMetric::PtOutside => self.pt_outside,
            SourceMetric::PtWeekend => self.pt_weekend,
            SourceMetric::PtHoliday => self.pt_holiday,
            SourceMetric::PtTotal => self.total_pt(),
            SourceMetric::BodyChallenge => self.bc_count,
            SourceMetric::OtPlain => self.ot_plain,
            SourceMetric::OtInbody => self.ot_inbody,
            SourceMetric::OtTotal => self.total_ot(),
        }
    }

    /// Returns the number of PT records with the given outcome.
    pub fn pt_outcome(&self, status: SessionStatus) -> u32 {
        self.pt_outcomes.get(&status).copied().unwrap_or(0)
    }

    /// Returns a copy with the personal sales figure set.
    pub fn with_personal_sales(mut self, personal_sales: Decimal) -> Self {
        self.personal_sales = personal_sales;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_statistics_are_zero() {
        let stats = MonthlyAttendanceStatistics::default();
        assert_eq!(stats.total_pt(), 0);
        assert_eq!(stats.total_ot(), 0);
        assert_eq!(stats.total_personal_hours(), Decimal::ZERO);
        assert_eq!(stats.personal_sales, Decimal::ZERO);
        assert_eq!(stats.pt_outcome(SessionStatus::Completed), 0);
    }

    #[test]
    fn test_metric_lookup_covers_ot() {
        let stats = MonthlyAttendanceStatistics {
            ot_plain: 3,
            ot_inbody: 2,
            ..Default::default()
        };
        assert_eq!(stats.metric(SourceMetric::OtPlain), 3);
        assert_eq!(stats.metric(SourceMetric::OtInbody), 2);
        assert_eq!(stats.metric(SourceMetric::OtTotal), 5);
    }

    #[test]
    fn test_with_personal_sales() {
        let stats = MonthlyAttendanceStatistics::default().with_personal_sales(Decimal::from(1_000));
        assert_eq!(stats.personal_sales, Decimal::from(1_000));
    }
}
