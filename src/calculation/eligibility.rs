//! Eligibility gate.
//!
//! Payroll is only computed for staff members whose monthly report has
//! been approved, and only from attendance records that were locked when
//! the month was finalized.

use std::collections::BTreeSet;

use crate::models::{AttendanceRecord, PayrollMonth, StaffMember};

/// Source of monthly report approvals.
pub trait ReportApprovals {
    /// Returns true if `staff_id` has an approved report for `month`.
    fn is_approved(&self, staff_id: &str, month: PayrollMonth) -> bool;
}

/// An in-memory set of approved `(staff_id, month)` reports.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{ApprovedReports, ReportApprovals};
/// use payroll_engine::models::PayrollMonth;
///
/// let march: PayrollMonth = "2025-03".parse().unwrap();
/// let approvals = ApprovedReports::from_iter([("staff_001".to_string(), march)]);
///
/// assert!(approvals.is_approved("staff_001", march));
/// assert!(!approvals.is_approved("staff_001", march.next()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovedReports(BTreeSet<(String, PayrollMonth)>);

impl ApprovedReports {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an approval.
    pub fn approve(&mut self, staff_id: impl Into<String>, month: PayrollMonth) {
        self.0.insert((staff_id.into(), month));
    }

    /// Number of approvals held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no approvals are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, PayrollMonth)> for ApprovedReports {
    fn from_iter<T: IntoIterator<Item = (String, PayrollMonth)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeSet<(String, PayrollMonth)>> for ApprovedReports {
    fn from(approvals: BTreeSet<(String, PayrollMonth)>) -> Self {
        Self(approvals)
    }
}

impl ReportApprovals for ApprovedReports {
    fn is_approved(&self, staff_id: &str, month: PayrollMonth) -> bool {
        self.0.contains(&(staff_id.to_string(), month))
    }
}

/// Returns the staff members with an approved report for `month`, in
/// input order.
pub fn eligible_staff<'a, A>(
    staff: &'a [StaffMember],
    month: PayrollMonth,
    approvals: &A,
) -> Vec<&'a StaffMember>
where
    A: ReportApprovals + ?Sized,
{
    staff
        .iter()
        .filter(|member| approvals.is_approved(&member.id, month))
        .collect()
}

/// Returns true if payroll may read `record` for a staff member and month:
/// it is locked, owned by `staff_id`, and starts within `month`.
pub fn is_payroll_record(record: &AttendanceRecord, staff_id: &str, month: PayrollMonth) -> bool {
    record.locked && record.staff_id == staff_id && month.contains(record.start_time)
}

/// Selects the records payroll may read for one staff member and month.
///
/// See [`is_payroll_record`].
pub fn payroll_records<'a, 's, I>(
    records: I,
    staff_id: &'s str,
    month: PayrollMonth,
) -> impl Iterator<Item = &'a AttendanceRecord>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    records
        .into_iter()
        .filter(move |record| is_payroll_record(record, staff_id, month))
}
