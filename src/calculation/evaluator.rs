//! Rule evaluation.
//!
//! Each compensation rule evaluates to one labeled line item plus an audit
//! step. Earning rules are evaluated against the staff member's monthly
//! statistics and personal sales; deduction rules are evaluated separately
//! against the frozen gross total (see the compositor).

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditWarning, CalculationType, CompensationRule, LineItem,
    MonthlyAttendanceStatistics, RuleBucket, SourceMetric,
};

use super::parameters::{EffectiveParameters, RuleParameters, select_tier_rate};

/// Name fragments used to bind a class-fee rule to a statistic when the
/// rule has no explicit `source_metric`. Checked in order.
const NAME_PATTERNS: &[(&[&str], SourceMetric)] = &[
    (&["근무내", "PT IN"], SourceMetric::PtInside),
    (&["근무외", "PT OUT"], SourceMetric::PtOutside),
    (&["주말"], SourceMetric::PtWeekend),
    (&["공휴일"], SourceMetric::PtHoliday),
    (&["BC", "바디챌린지"], SourceMetric::BodyChallenge),
];

/// How a class-fee rule's statistic was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricOrigin {
    /// Configured on the rule.
    Explicit,
    /// Matched from the rule name.
    NamePattern,
    /// No match; total PT used.
    Fallback,
}

/// The statistic a class-fee rule reads, and how it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricBinding {
    /// The selected statistic.
    pub metric: SourceMetric,
    /// How it was selected.
    pub origin: MetricOrigin,
}

/// Returns every statistic whose name fragments occur in `name`, in
/// pattern order.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::infer_metrics_from_name;
/// use payroll_engine::models::SourceMetric;
///
/// assert_eq!(infer_metrics_from_name("PT 근무내"), vec![SourceMetric::PtInside]);
/// assert!(infer_metrics_from_name("수업료").is_empty());
/// ```
pub fn infer_metrics_from_name(name: &str) -> Vec<SourceMetric> {
    NAME_PATTERNS
        .iter()
        .filter(|(fragments, _)| fragments.iter().any(|fragment| name.contains(fragment)))
        .map(|(_, metric)| *metric)
        .collect()
}

/// Chooses the statistic for a class-fee rule.
///
/// An explicit `source_metric` wins. Otherwise the first name match is
/// used; several matches raise `AMBIGUOUS_METRIC` and no match falls back
/// to total PT with `METRIC_FALLBACK`.
pub fn bind_source_metric(rule: &CompensationRule) -> (MetricBinding, Vec<AuditWarning>) {
    if let Some(metric) = rule.source_metric {
        return (
            MetricBinding {
                metric,
                origin: MetricOrigin::Explicit,
            },
            Vec::new(),
        );
    }

    let matches = infer_metrics_from_name(&rule.name);
    let mut warnings = Vec::new();

    let binding = match matches.as_slice() {
        [] => {
            warn!(rule_id = %rule.id, rule_name = %rule.name, "Class fee rule name matches no statistic; using total PT");
            warnings.push(AuditWarning::new(
                "METRIC_FALLBACK",
                format!(
                    "Rule '{}' ({}) matches no session statistic; total PT sessions used",
                    rule.id, rule.name
                ),
                "medium",
            ));
            MetricBinding {
                metric: SourceMetric::PtTotal,
                origin: MetricOrigin::Fallback,
            }
        }
        [first, rest @ ..] => {
            if !rest.is_empty() {
                warn!(rule_id = %rule.id, rule_name = %rule.name, "Class fee rule name matches several statistics");
                warnings.push(AuditWarning::new(
                    "AMBIGUOUS_METRIC",
                    format!(
                        "Rule '{}' ({}) matches {:?}; {:?} used",
                        rule.id, rule.name, matches, first
                    ),
                    "medium",
                ));
            }
            MetricBinding {
                metric: *first,
                origin: MetricOrigin::NamePattern,
            }
        }
    };

    (binding, warnings)
}

/// The result of evaluating one rule.
#[derive(Debug, Clone)]
pub struct RuleEvaluation {
    /// The line item; its amount may be zero.
    pub line_item: LineItem,
    /// The bucket the item contributes to.
    pub bucket: RuleBucket,
    /// The audit step recording this evaluation.
    pub audit_step: AuditStep,
    /// Warnings raised while evaluating.
    pub warnings: Vec<AuditWarning>,
}

/// Evaluates an earning rule.
///
/// Deduction rules are rejected with [`EngineError::DeductionOutsidePhase`];
/// they must go through [`evaluate_deduction`] once gross pay is frozen.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{evaluate_rule, EffectiveParameters};
/// use payroll_engine::models::{
///     CalculationType, CompensationRule, MonthlyAttendanceStatistics, ParameterMap, ParameterValue,
/// };
/// use rust_decimal::Decimal;
///
/// let rule = CompensationRule {
///     id: "pt_inside".to_string(),
///     name: "PT 근무내".to_string(),
///     calculation_type: CalculationType::ClassFee,
///     source_metric: None,
///     default_parameters: ParameterMap::new(),
/// };
/// let params = EffectiveParameters::from(ParameterMap::from([(
///     "rate".to_string(),
///     ParameterValue::Number(Decimal::from(20_000)),
/// )]));
/// let stats = MonthlyAttendanceStatistics { pt_inside: 10, ..Default::default() };
///
/// let evaluation = evaluate_rule(&rule, &params, &stats, Decimal::ZERO, 1).unwrap();
/// assert_eq!(evaluation.line_item.amount, Decimal::from(200_000));
/// assert_eq!(evaluation.line_item.description, "10 sessions × 20,000 won");
/// ```
pub fn evaluate_rule(
    rule: &CompensationRule,
    params: &EffectiveParameters,
    statistics: &MonthlyAttendanceStatistics,
    personal_sales: Decimal,
    step_number: u32,
) -> EngineResult<RuleEvaluation> {
    if rule.calculation_type == CalculationType::TaxDeduction {
        return Err(EngineError::DeductionOutsidePhase {
            rule_id: rule.id.clone(),
        });
    }

    let narrowed = RuleParameters::from_effective(rule.calculation_type, params);
    let mut warnings = narrowed.warnings;

    let (amount, description, input, output) = match narrowed.parameters {
        RuleParameters::Flat { amount } => (
            amount,
            format!("{} won", format_won(amount)),
            serde_json::json!({ "amount": amount.normalize().to_string() }),
            serde_json::json!({ "amount": amount.normalize().to_string() }),
        ),
        RuleParameters::Hourly { rate } => (
            rate,
            format!("{} won (hourly pay)", format_won(rate)),
            serde_json::json!({ "rate": rate.normalize().to_string() }),
            serde_json::json!({ "amount": rate.normalize().to_string() }),
        ),
        RuleParameters::PerSession { rate, tiers } => {
            let (binding, metric_warnings) = bind_source_metric(rule);
            warnings.extend(metric_warnings);

            let count = statistics.metric(binding.metric);
            let tier_rate = select_tier_rate(&tiers, Decimal::from(count));
            let applied_rate = tier_rate.unwrap_or(rate);
            let amount = Decimal::from(count) * applied_rate;

            let description = format!(
                "{} sessions × {} won{}",
                count,
                format_won(applied_rate),
                if tier_rate.is_some() { " (tier rate)" } else { "" }
            );
            (
                amount,
                description,
                serde_json::json!({
                    "metric": binding.metric,
                    "metric_origin": format!("{:?}", binding.origin),
                    "count": count,
                    "rate": rate.normalize().to_string(),
                    "tier_count": tiers.len()
                }),
                serde_json::json!({
                    "applied_rate": applied_rate.normalize().to_string(),
                    "tier_applied": tier_rate.is_some(),
                    "amount": amount.normalize().to_string()
                }),
            )
        }
        RuleParameters::Percentage { rate, tiers } => {
            let tier_rate = select_tier_rate(&tiers, personal_sales);
            let applied_rate = tier_rate.unwrap_or(rate);
            let amount = personal_sales * applied_rate / Decimal::ONE_HUNDRED;

            let description = format!(
                "personal sales {} won × {}%{}",
                format_won(personal_sales),
                applied_rate.normalize(),
                if tier_rate.is_some() { " (tier rate)" } else { "" }
            );
            (
                amount,
                description,
                serde_json::json!({
                    "personal_sales": personal_sales.normalize().to_string(),
                    "rate": rate.normalize().to_string(),
                    "tier_count": tiers.len()
                }),
                serde_json::json!({
                    "applied_rate": applied_rate.normalize().to_string(),
                    "tier_applied": tier_rate.is_some(),
                    "amount": amount.normalize().to_string()
                }),
            )
        }
        RuleParameters::Deduction { .. } => {
            return Err(EngineError::DeductionOutsidePhase {
                rule_id: rule.id.clone(),
            });
        }
    };

    let description = append_note(description, narrowed.note.as_deref());
    Ok(build_evaluation(
        rule,
        amount,
        description,
        input,
        output,
        warnings,
        step_number,
    ))
}

/// Evaluates a deduction rule against the frozen gross total.
///
/// The withheld amount is `round(gross × rate / 100)` to whole won,
/// midpoint away from zero. The line item carries the negated amount.
/// A negative gross withholds nothing and raises `NEGATIVE_GROSS`.
pub fn evaluate_deduction(
    rule: &CompensationRule,
    params: &EffectiveParameters,
    frozen_gross: Decimal,
    step_number: u32,
) -> EngineResult<RuleEvaluation> {
    if rule.calculation_type != CalculationType::TaxDeduction {
        return Err(EngineError::NotADeduction {
            rule_id: rule.id.clone(),
        });
    }

    let narrowed = RuleParameters::from_effective(rule.calculation_type, params);
    let rate = match narrowed.parameters {
        RuleParameters::Deduction { rate } => rate,
        _ => Decimal::ZERO,
    };

    let mut warnings = narrowed.warnings;
    let base = if frozen_gross < Decimal::ZERO {
        warn!(rule_id = %rule.id, gross_total = %frozen_gross, "Gross total is negative; nothing withheld");
        warnings.push(AuditWarning::new(
            "NEGATIVE_GROSS",
            format!(
                "Gross total {} won is negative; '{}' withholds nothing",
                format_won(frozen_gross),
                rule.id
            ),
            "high",
        ));
        Decimal::ZERO
    } else {
        frozen_gross
    };

    let withheld = round_won(base * rate / Decimal::ONE_HUNDRED);
    let description = append_note(
        format!("{} won × {}%", format_won(base), rate.normalize()),
        narrowed.note.as_deref(),
    );

    let input = serde_json::json!({
        "gross_total": frozen_gross.normalize().to_string(),
        "rate": rate.normalize().to_string()
    });
    let output = serde_json::json!({
        "withheld": withheld.normalize().to_string()
    });

    let amount = if withheld.is_zero() {
        Decimal::ZERO
    } else {
        -withheld
    };

    Ok(build_evaluation(
        rule,
        amount,
        description,
        input,
        output,
        warnings,
        step_number,
    ))
}

fn build_evaluation(
    rule: &CompensationRule,
    amount: Decimal,
    description: String,
    input: serde_json::Value,
    output: serde_json::Value,
    warnings: Vec<AuditWarning>,
    step_number: u32,
) -> RuleEvaluation {
    let bucket = rule.calculation_type.bucket();
    let is_deduction = bucket == RuleBucket::Deduction;

    let audit_step = AuditStep {
        step_number,
        rule_id: rule.id.clone(),
        rule_name: rule.name.clone(),
        calculation_type: rule.calculation_type.to_string(),
        input,
        output,
        reasoning: format!("{}: {} = {} won", rule.name, description, format_won(amount)),
    };

    RuleEvaluation {
        line_item: LineItem {
            rule_id: Some(rule.id.clone()),
            rule_name: rule.name.clone(),
            bucket,
            amount,
            description,
            is_deduction,
        },
        bucket,
        audit_step,
        warnings,
    }
}

fn append_note(description: String, note: Option<&str>) -> String {
    match note {
        Some(note) => format!("{} / {}", description, note),
        None => description,
    }
}

/// Rounds to whole won, midpoint away from zero.
pub fn round_won(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a won amount with thousands separators.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::format_won;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_won(Decimal::from(1_234_567)), "1,234,567");
/// assert_eq!(format_won(Decimal::new(-65005, 1)), "-6,500.5");
/// ```
pub fn format_won(amount: Decimal) -> String {
    let text = amount.normalize().to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}
