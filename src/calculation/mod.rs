//! Calculation logic for the payroll engine.
//!
//! This module contains the pieces of a monthly payroll computation:
//! the eligibility gate, attendance statistics aggregation, personal
//! sales aggregation, parameter resolution, per-rule evaluation, and the
//! two-phase compositor that turns them into a [`PayrollResult`](crate::models::PayrollResult).

mod classifier;
mod compositor;
mod eligibility;
mod evaluator;
mod parameters;
mod sales;
mod statistics;

pub use classifier::{CalendarClassifier, WorkTimeClassifier};
pub use compositor::compute_monthly_payroll;
pub use eligibility::{
    ApprovedReports, ReportApprovals, eligible_staff, is_payroll_record, payroll_records,
};
pub use evaluator::{
    MetricBinding, MetricOrigin, RuleEvaluation, bind_source_metric, evaluate_deduction,
    evaluate_rule, format_won, infer_metrics_from_name, round_won,
};
pub use parameters::{
    AMOUNT_KEY, EffectiveParameters, NOTE_KEY, NarrowedParameters, RATE_KEY, RuleParameters,
    TIERS_KEY, parse_numeric, resolve_parameters, select_tier_rate,
};
pub use sales::{
    PersonalSalesLedger, RegistrarDirectory, StaffNameDirectory, UnmatchedSale,
    aggregate_personal_sales,
};
pub use statistics::aggregate_statistics;
