//! Payroll composition.
//!
//! The compositor runs one staff member's template through two phases:
//!
//! 1. **Accumulating**: every earning rule is evaluated in template order
//!    and summed into gross pay.
//! 2. **Deducting**: gross pay is frozen, then every deduction rule is
//!    evaluated against that same frozen total.
//!
//! Finalizing yields `net = gross - deductions`. A deduction never sees a
//! partially accumulated gross, so reordering earning rules cannot change
//! the amount withheld.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{
    AuditStep, AuditTrace, AuditWarning, CompensationRule, CompensationTemplate, LineItem,
    MonthlyAttendanceStatistics, ParameterMap, PayrollMonth, PayrollResult, RuleBucket,
    StaffMember,
};

use super::evaluator::{RuleEvaluation, evaluate_deduction, evaluate_rule};
use super::parameters::resolve_parameters;

/// Computes one staff member's monthly payroll.
///
/// A missing template, or a template without items, yields a single
/// "not configured" line item with all totals zero.
///
/// Line items are emitted grouped by bucket (base, class, incentive,
/// deduction), keeping template order within each bucket. Zero-amount
/// items are omitted.
///
/// Incentives read `personal_sales`; the figure carried on `statistics`
/// is not consulted.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use payroll_engine::calculation::compute_monthly_payroll;
/// use payroll_engine::models::{MonthlyAttendanceStatistics, StaffMember};
/// use rust_decimal::Decimal;
///
/// let staff = StaffMember::new("staff_001", "김민수", "트레이너");
/// let result = compute_monthly_payroll(
///     &staff,
///     "2025-03".parse().unwrap(),
///     None,
///     &BTreeMap::new(),
///     &MonthlyAttendanceStatistics::default(),
///     Decimal::ZERO,
/// );
///
/// assert!(result.is_not_configured());
/// assert_eq!(result.net_total, Decimal::ZERO);
/// ```
pub fn compute_monthly_payroll(
    staff: &StaffMember,
    month: PayrollMonth,
    template: Option<&CompensationTemplate>,
    personal_parameters: &BTreeMap<String, ParameterMap>,
    statistics: &MonthlyAttendanceStatistics,
    personal_sales: Decimal,
) -> PayrollResult {
    let template = match template {
        Some(template) if !template.items.is_empty() => template,
        Some(template) => {
            return not_configured(
                staff,
                month,
                format!("Compensation template '{}' has no rules", template.name),
            );
        }
        None => {
            return not_configured(
                staff,
                month,
                "No compensation template is assigned".to_string(),
            );
        }
    };

    let (earning_rules, deduction_rules): (Vec<&CompensationRule>, Vec<&CompensationRule>) =
        template
            .items
            .iter()
            .partition(|rule| rule.calculation_type.bucket() != RuleBucket::Deduction);

    let mut accumulating = Accumulating::default();
    for rule in earning_rules {
        let params = resolve_parameters(rule, personal_parameters);
        let step_number = accumulating.next_step();
        match evaluate_rule(rule, &params, statistics, personal_sales, step_number) {
            Ok(evaluation) => accumulating.add(evaluation),
            Err(err) => accumulating.skip(rule, err.to_string()),
        }
    }

    let mut deducting = accumulating.freeze();
    for rule in deduction_rules {
        let params = resolve_parameters(rule, personal_parameters);
        let step_number = deducting.next_step();
        match evaluate_deduction(rule, &params, deducting.frozen_gross, step_number) {
            Ok(evaluation) => deducting.add(evaluation),
            Err(err) => deducting.skip(rule, err.to_string()),
        }
    }

    let result = deducting.finalize(staff, month);

    debug!(
        staff_id = %staff.id,
        month = %month,
        template_id = %template.id,
        line_items = result.line_items.len(),
        gross_total = %result.gross_total,
        tax_deduction_total = %result.tax_deduction_total,
        net_total = %result.net_total,
        "Computed monthly payroll"
    );

    result
}

fn not_configured(staff: &StaffMember, month: PayrollMonth, reason: String) -> PayrollResult {
    debug!(staff_id = %staff.id, month = %month, reason = %reason, "Payroll not configured");

    PayrollResult {
        staff_id: staff.id.clone(),
        month,
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        line_items: vec![LineItem::not_configured(reason.clone())],
        gross_total: Decimal::ZERO,
        tax_deduction_total: Decimal::ZERO,
        net_total: Decimal::ZERO,
        audit_trace: AuditTrace {
            steps: Vec::new(),
            warnings: vec![AuditWarning::new("TEMPLATE_NOT_CONFIGURED", reason, "low")],
        },
    }
}

/// Evaluations and trace shared by both phases.
#[derive(Debug, Default)]
struct Trace {
    evaluations: Vec<RuleEvaluation>,
    steps: Vec<AuditStep>,
    warnings: Vec<AuditWarning>,
}

impl Trace {
    fn next_step(&self) -> u32 {
        self.steps.len() as u32 + 1
    }

    fn record(&mut self, mut evaluation: RuleEvaluation) -> Decimal {
        let amount = evaluation.line_item.amount;
        self.steps.push(evaluation.audit_step.clone());
        self.warnings.append(&mut evaluation.warnings);
        self.evaluations.push(evaluation);
        amount
    }

    fn skip(&mut self, rule: &CompensationRule, message: String) {
        warn!(rule_id = %rule.id, error = %message, "Rule skipped");
        self.warnings
            .push(AuditWarning::new("RULE_SKIPPED", message, "high"));
    }
}

/// Phase one: summing earning rules into gross pay.
#[derive(Debug, Default)]
struct Accumulating {
    trace: Trace,
    gross_total: Decimal,
}

impl Accumulating {
    fn next_step(&self) -> u32 {
        self.trace.next_step()
    }

    fn add(&mut self, evaluation: RuleEvaluation) {
        self.gross_total += self.trace.record(evaluation);
    }

    fn skip(&mut self, rule: &CompensationRule, message: String) {
        self.trace.skip(rule, message);
    }

    fn freeze(self) -> Deducting {
        Deducting {
            trace: self.trace,
            frozen_gross: self.gross_total,
            tax_deduction_total: Decimal::ZERO,
        }
    }
}

/// Phase two: withholding against the frozen gross total.
#[derive(Debug)]
struct Deducting {
    trace: Trace,
    frozen_gross: Decimal,
    tax_deduction_total: Decimal,
}

impl Deducting {
    fn next_step(&self) -> u32 {
        self.trace.next_step()
    }

    fn add(&mut self, evaluation: RuleEvaluation) {
        self.tax_deduction_total -= self.trace.record(evaluation);
    }

    fn skip(&mut self, rule: &CompensationRule, message: String) {
        self.trace.skip(rule, message);
    }

    fn finalize(self, staff: &StaffMember, month: PayrollMonth) -> PayrollResult {
        let Trace {
            mut evaluations,
            steps,
            warnings,
        } = self.trace;

        evaluations.sort_by_key(|evaluation| evaluation.bucket);
        let line_items = evaluations
            .into_iter()
            .map(|evaluation| evaluation.line_item)
            .filter(|item| !item.amount.is_zero())
            .collect();

        PayrollResult {
            staff_id: staff.id.clone(),
            month,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            line_items,
            gross_total: self.frozen_gross,
            tax_deduction_total: self.tax_deduction_total,
            net_total: self.frozen_gross - self.tax_deduction_total,
            audit_trace: AuditTrace { steps, warnings },
        }
    }
}
