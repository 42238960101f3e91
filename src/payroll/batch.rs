//! Monthly payroll runs.
//!
//! [`recompute`] is the pure per-staff computation. [`run_monthly_payroll`]
//! applies the eligibility gate to a whole roster, derives personal sales
//! from the payment ledger, and recomputes every eligible staff member.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::calculation::{
    ReportApprovals, StaffNameDirectory, UnmatchedSale, aggregate_personal_sales,
    aggregate_statistics, compute_monthly_payroll, eligible_staff, payroll_records,
};
use crate::config::CompensationConfig;
use crate::models::{AttendanceRecord, PaymentRecord, PayrollMonth, PayrollResult, StaffMember};

use super::ledger::PayrollSink;

/// Computes one staff member's payroll from raw inputs.
///
/// Only locked records owned by the staff member and starting within
/// `month` are read. A staff member without an assignment gets the
/// "not configured" result. The eligibility gate is not applied here;
/// callers recomputing a single staff member are expected to have checked
/// approval already.
///
/// Calling this twice with unchanged inputs yields equal results.
pub fn recompute(
    staff: &StaffMember,
    month: PayrollMonth,
    records: &[AttendanceRecord],
    personal_sales: Decimal,
    config: &CompensationConfig,
) -> PayrollResult {
    compute_for_staff(staff, month, records, personal_sales, config)
}

fn compute_for_staff<'a, I>(
    staff: &StaffMember,
    month: PayrollMonth,
    records: I,
    personal_sales: Decimal,
    config: &CompensationConfig,
) -> PayrollResult
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let statistics = aggregate_statistics(payroll_records(records, &staff.id, month))
        .with_personal_sales(personal_sales);

    let no_overrides = BTreeMap::new();
    let personal_parameters = config
        .assignment_for(&staff.id)
        .map_or(&no_overrides, |assignment| &assignment.personal_parameters);

    compute_monthly_payroll(
        staff,
        month,
        config.template_for(&staff.id),
        personal_parameters,
        &statistics,
        personal_sales,
    )
}

/// Everything a monthly run reads.
pub struct PayrollRunInput<'a> {
    /// The month to compute.
    pub month: PayrollMonth,
    /// The roster, in output order.
    pub staff: &'a [StaffMember],
    /// Attendance records for any staff and month; filtered per staff member.
    pub records: &'a [AttendanceRecord],
    /// The payment ledger; PT sales in `month` become personal sales.
    pub payments: &'a [PaymentRecord],
    /// Monthly report approvals.
    pub approvals: &'a dyn ReportApprovals,
    /// The compensation configuration.
    pub config: &'a CompensationConfig,
}

/// The outcome of a monthly run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Identifier attached to this run's log events.
    pub run_id: Uuid,
    /// The month computed.
    pub month: PayrollMonth,
    /// One result per eligible staff member, in roster order.
    pub results: Vec<PayrollResult>,
    /// Staff ids without an approved report, in roster order.
    pub skipped: Vec<String>,
    /// PT payments whose registrar matched no staff member.
    pub unmatched_sales: Vec<UnmatchedSale>,
}

impl PayrollRun {
    /// Hands every result to `sink`, returning how many were stored.
    pub fn persist<S>(&self, sink: &mut S) -> usize
    where
        S: PayrollSink + ?Sized,
    {
        for result in &self.results {
            sink.upsert(result.clone());
        }
        self.results.len()
    }

    /// Sum of net pay across all results.
    pub fn net_total(&self) -> Decimal {
        self.results.iter().map(|result| result.net_total).sum()
    }
}

/// Runs payroll for a month across a roster.
///
/// Staff members without an approved report are listed in
/// [`PayrollRun::skipped`] and produce no result. Personal sales are
/// aggregated from the payment ledger by matching registrar names to staff
/// display names.
pub fn run_monthly_payroll(input: PayrollRunInput<'_>) -> PayrollRun {
    let run_id = Uuid::new_v4();
    let span = info_span!("payroll_run", run_id = %run_id, month = %input.month);
    let _guard = span.enter();
    let start_time = Instant::now();

    info!(
        run_id = %run_id,
        staff_count = input.staff.len(),
        record_count = input.records.len(),
        payment_count = input.payments.len(),
        "Starting monthly payroll run"
    );

    let directory = StaffNameDirectory::from_staff(input.staff);
    let sales = aggregate_personal_sales(input.payments, input.month, &directory);

    let mut records_by_staff: BTreeMap<&str, Vec<&AttendanceRecord>> = BTreeMap::new();
    for record in input.records {
        records_by_staff
            .entry(record.staff_id.as_str())
            .or_default()
            .push(record);
    }

    let eligible = eligible_staff(input.staff, input.month, input.approvals);
    let eligible_ids: BTreeSet<&str> = eligible.iter().map(|member| member.id.as_str()).collect();

    let skipped: Vec<String> = input
        .staff
        .iter()
        .filter(|member| !eligible_ids.contains(member.id.as_str()))
        .map(|member| {
            warn!(
                run_id = %run_id,
                staff_id = %member.id,
                "Monthly report not approved; staff member skipped"
            );
            member.id.clone()
        })
        .collect();

    let mut results = Vec::with_capacity(eligible.len());
    for staff in eligible {
        let records = records_by_staff
            .get(staff.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        let result = compute_for_staff(
            staff,
            input.month,
            records.iter().copied(),
            sales.total_for(&staff.id),
            input.config,
        );
        results.push(result);
    }

    let run = PayrollRun {
        run_id,
        month: input.month,
        results,
        skipped,
        unmatched_sales: sales.unmatched,
    };

    info!(
        run_id = %run_id,
        computed = run.results.len(),
        skipped = run.skipped.len(),
        unmatched_sales = run.unmatched_sales.len(),
        net_total = %run.net_total(),
        duration_us = start_time.elapsed().as_micros(),
        "Monthly payroll run completed"
    );

    run
}
