//! Payroll runs and result storage.
//!
//! This module ties the calculation pieces together: a pure per-staff
//! [`recompute`], a gated monthly [`run_monthly_payroll`] over a roster, and
//! the [`PayrollSink`] contract results are persisted through.

mod batch;
mod ledger;

pub use batch::{PayrollRun, PayrollRunInput, recompute, run_monthly_payroll};
pub use ledger::{PayrollLedger, PayrollSink};
