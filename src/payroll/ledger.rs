//! Result persistence contract and an in-memory store.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{PayrollMonth, PayrollResult};

/// A destination for computed results, keyed by `(staff_id, month)`.
///
/// Implementations must upsert: storing a result for a key that already
/// holds one replaces it.
pub trait PayrollSink {
    /// Stores `result`, replacing any previous result for the same key.
    fn upsert(&mut self, result: PayrollResult);
}

/// An in-memory, upserting result store.
///
/// The store doubles as a caller-owned cache: when a staff member's
/// records or assignment change, [`invalidate`](PayrollLedger::invalidate)
/// the entry and recompute.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use payroll_engine::calculation::compute_monthly_payroll;
/// use payroll_engine::models::{MonthlyAttendanceStatistics, StaffMember};
/// use payroll_engine::payroll::{PayrollLedger, PayrollSink};
/// use rust_decimal::Decimal;
///
/// let staff = StaffMember::new("staff_001", "김민수", "트레이너");
/// let month = "2025-03".parse().unwrap();
/// let result = compute_monthly_payroll(
///     &staff, month, None, &BTreeMap::new(),
///     &MonthlyAttendanceStatistics::default(), Decimal::ZERO,
/// );
///
/// let mut ledger = PayrollLedger::new();
/// ledger.upsert(result.clone());
/// ledger.upsert(result);
/// assert_eq!(ledger.len(), 1);
/// assert!(ledger.get("staff_001", month).is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayrollLedger {
    entries: BTreeMap<(String, PayrollMonth), PayrollResult>,
}

impl PayrollLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored result for a staff member and month.
    pub fn get(&self, staff_id: &str, month: PayrollMonth) -> Option<&PayrollResult> {
        self.entries.get(&(staff_id.to_string(), month))
    }

    /// Removes and returns the stored result for a staff member and month.
    pub fn invalidate(&mut self, staff_id: &str, month: PayrollMonth) -> Option<PayrollResult> {
        let removed = self.entries.remove(&(staff_id.to_string(), month));
        if removed.is_some() {
            debug!(staff_id = %staff_id, month = %month, "Invalidated payroll result");
        }
        removed
    }

    /// Results stored for `month`, ordered by staff id.
    pub fn for_month(&self, month: PayrollMonth) -> impl Iterator<Item = &PayrollResult> {
        self.entries
            .iter()
            .filter(move |((_, entry_month), _)| *entry_month == month)
            .map(|(_, result)| result)
    }

    /// Number of stored results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PayrollSink for PayrollLedger {
    fn upsert(&mut self, result: PayrollResult) {
        let key = (result.staff_id.clone(), result.month);
        if self.entries.insert(key, result).is_some() {
            debug!("Replaced existing payroll result");
        }
    }
}
