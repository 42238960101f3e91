//! Payroll result models.
//!
//! This module contains the [`PayrollResult`] type and its associated
//! structures: itemized line items, totals, and the audit trace that
//! records how each rule was evaluated.
//!
//! A result contains no timestamps or random identifiers, so recomputing
//! it from unchanged inputs serializes to identical bytes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PayrollMonth, RuleBucket};

/// Label of the sentinel line item emitted when no template applies.
pub const NOT_CONFIGURED_LABEL: &str = "설정 없음";

/// A single itemized entry on a payroll result.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{LineItem, RuleBucket};
/// use rust_decimal::Decimal;
///
/// let item = LineItem {
///     rule_id: Some("pt_inside_fee".to_string()),
///     rule_name: "PT 근무내".to_string(),
///     bucket: RuleBucket::Class,
///     amount: Decimal::from(200_000),
///     description: "10 sessions × 20,000 won".to_string(),
///     is_deduction: false,
/// };
/// assert!(!item.is_deduction);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The rule that produced this item; absent for the sentinel item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    /// The rule's display name.
    pub rule_name: String,
    /// The bucket the item contributes to.
    pub bucket: RuleBucket,
    /// Amount in won; negative for deductions.
    pub amount: Decimal,
    /// Human-readable account of the inputs used.
    pub description: String,
    /// Whether this item is a deduction.
    pub is_deduction: bool,
}

impl LineItem {
    /// Creates the sentinel item for a staff member without a usable template.
    pub fn not_configured(description: impl Into<String>) -> Self {
        Self {
            rule_id: None,
            rule_name: NOT_CONFIGURED_LABEL.to_string(),
            bucket: RuleBucket::Base,
            amount: Decimal::ZERO,
            description: description.into(),
            is_deduction: false,
        }
    }
}

/// A single step in the audit trace recording a rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The id of the rule that was evaluated.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The rule's calculation type label.
    pub calculation_type: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the result.
    pub reasoning: String,
}

/// A warning generated during computation.
///
/// Warnings flag configuration that was tolerated rather than rejected,
/// such as a missing rate or a class-fee rule whose statistic had to be
/// guessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for one staff member's computation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of rule evaluations.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during computation.
    pub warnings: Vec<AuditWarning>,
}

/// The monthly payroll breakdown for one staff member.
///
/// Invariants:
/// - `gross_total` is the sum of all non-deduction line item amounts.
/// - `tax_deduction_total` is a positive magnitude; deduction line items
///   carry the negated amount.
/// - `net_total == gross_total - tax_deduction_total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// The staff member the result belongs to.
    pub staff_id: String,
    /// The payroll month.
    pub month: PayrollMonth,
    /// The version of the engine that produced the result.
    pub engine_version: String,
    /// Itemized entries; zero-amount items are omitted.
    pub line_items: Vec<LineItem>,
    /// Total before deductions.
    pub gross_total: Decimal,
    /// Total withheld, as a positive magnitude.
    pub tax_deduction_total: Decimal,
    /// Amount paid out.
    pub net_total: Decimal,
    /// How the result was reached.
    pub audit_trace: AuditTrace,
}

impl PayrollResult {
    /// Returns true if this result is the "not configured" sentinel.
    pub fn is_not_configured(&self) -> bool {
        matches!(
            self.line_items.as_slice(),
            [item] if item.rule_id.is_none() && item.rule_name == NOT_CONFIGURED_LABEL
        )
    }

    /// Iterates over deduction line items.
    pub fn deductions(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items.iter().filter(|item| item.is_deduction)
    }

    /// Iterates over earning line items.
    pub fn earnings(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items.iter().filter(|item| !item.is_deduction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_result(line_items: Vec<LineItem>) -> PayrollResult {
        PayrollResult {
            staff_id: "staff_001".to_string(),
            month: "2025-03".parse().unwrap(),
            engine_version: "0.1.0".to_string(),
            line_items,
            gross_total: Decimal::ZERO,
            tax_deduction_total: Decimal::ZERO,
            net_total: Decimal::ZERO,
            audit_trace: AuditTrace::default(),
        }
    }

    #[test]
    fn test_not_configured_item() {
        let item = LineItem::not_configured("no template");
        assert_eq!(item.rule_name, "설정 없음");
        assert_eq!(item.amount, Decimal::ZERO);
        assert!(!item.is_deduction);
        assert!(item.rule_id.is_none());
    }

    #[test]
    fn test_is_not_configured_detects_sentinel() {
        let result = create_result(vec![LineItem::not_configured("no template")]);
        assert!(result.is_not_configured());

        let result = create_result(vec![LineItem {
            rule_id: Some("base".to_string()),
            rule_name: "기본급".to_string(),
            bucket: RuleBucket::Base,
            amount: dec("2000000"),
            description: "flat".to_string(),
            is_deduction: false,
        }]);
        assert!(!result.is_not_configured());
    }

    #[test]
    fn test_line_item_serialization_omits_missing_rule_id() {
        let json = serde_json::to_value(LineItem::not_configured("no template")).unwrap();
        assert!(json.get("rule_id").is_none());
        assert_eq!(json["amount"], "0");
        assert_eq!(json["bucket"], "base");
    }

    #[test]
    fn test_deductions_and_earnings_filters() {
        let result = create_result(vec![
            LineItem {
                rule_id: Some("fee".to_string()),
                rule_name: "PT 근무내".to_string(),
                bucket: RuleBucket::Class,
                amount: dec("200000"),
                description: String::new(),
                is_deduction: false,
            },
            LineItem {
                rule_id: Some("tax".to_string()),
                rule_name: "사업소득세".to_string(),
                bucket: RuleBucket::Deduction,
                amount: dec("-6600"),
                description: String::new(),
                is_deduction: true,
            },
        ]);

        assert_eq!(result.earnings().count(), 1);
        assert_eq!(result.deductions().count(), 1);
        assert_eq!(result.deductions().next().unwrap().amount, dec("-6600"));
    }
}
