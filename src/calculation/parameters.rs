//! Rule parameter resolution.
//!
//! A rule's effective parameters are its template defaults overlaid with
//! the staff member's personal overrides. The raw map is then narrowed to
//! a [`RuleParameters`] variant that carries only the fields the rule's
//! calculation type reads.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::{
    AuditWarning, CalculationType, CompensationRule, ParameterMap, ParameterValue, Tier,
};

/// Parameter key holding a flat amount.
pub const AMOUNT_KEY: &str = "amount";
/// Parameter key holding a rate.
pub const RATE_KEY: &str = "rate";
/// Parameter key holding a bracket list.
pub const TIERS_KEY: &str = "tiers";
/// Parameter key holding free text appended to the line item description.
pub const NOTE_KEY: &str = "note";

/// The merged parameter map a rule is evaluated with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EffectiveParameters {
    values: ParameterMap,
}

impl EffectiveParameters {
    /// Returns the raw value for a key.
    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.values.get(key)
    }

    /// Returns a numeric value, or `None` when absent or not numeric.
    pub fn decimal(&self, key: &str) -> Option<Decimal> {
        match self.values.get(key)? {
            ParameterValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns a text value.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key)? {
            ParameterValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the bracket list, or an empty slice.
    pub fn tiers(&self) -> &[Tier] {
        match self.values.get(TIERS_KEY) {
            Some(ParameterValue::Tiers(tiers)) => tiers,
            _ => &[],
        }
    }

    /// Returns the underlying map.
    pub fn as_map(&self) -> &ParameterMap {
        &self.values
    }
}

impl From<ParameterMap> for EffectiveParameters {
    fn from(values: ParameterMap) -> Self {
        Self { values }
    }
}

/// Resolves the effective parameters for one rule.
///
/// Override keys win; absent keys fall back to the rule default. `tiers` is
/// replaced as a whole list. Numeric-looking text is coerced to a number;
/// other text is kept as-is.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use payroll_engine::calculation::resolve_parameters;
/// use payroll_engine::models::{CalculationType, CompensationRule, ParameterMap, ParameterValue};
/// use rust_decimal::Decimal;
///
/// let rule = CompensationRule {
///     id: "pt_fee".to_string(),
///     name: "PT 근무내".to_string(),
///     calculation_type: CalculationType::ClassFee,
///     source_metric: None,
///     default_parameters: ParameterMap::from([("rate".to_string(), ParameterValue::Number(Decimal::from(20_000)))]),
/// };
/// let overrides = BTreeMap::from([(
///     "pt_fee".to_string(),
///     ParameterMap::from([("rate".to_string(), ParameterValue::Text("25,000".to_string()))]),
/// )]);
///
/// let effective = resolve_parameters(&rule, &overrides);
/// assert_eq!(effective.decimal("rate"), Some(Decimal::from(25_000)));
/// ```
pub fn resolve_parameters(
    rule: &CompensationRule,
    personal_parameters: &BTreeMap<String, ParameterMap>,
) -> EffectiveParameters {
    let mut values = rule.default_parameters.clone();

    if let Some(overrides) = personal_parameters.get(&rule.id) {
        for (key, value) in overrides {
            values.insert(key.clone(), value.clone());
        }
    }

    let values = values
        .into_iter()
        .map(|(key, value)| (key, coerce(value)))
        .collect();

    EffectiveParameters { values }
}

fn coerce(value: ParameterValue) -> ParameterValue {
    match value {
        ParameterValue::Text(text) => match parse_numeric(&text) {
            Some(number) => ParameterValue::Number(number),
            None => ParameterValue::Text(text),
        },
        other => other,
    }
}

/// Parses numeric-looking text such as `"20,000"`, `" 3.3 "`, or `"3.3%"`.
pub fn parse_numeric(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned).ok()
}

/// Parameters narrowed to the shape a calculation type uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleParameters {
    /// Flat amount: base salary, fixed, allowance, etc, bonus.
    Flat {
        /// The amount paid.
        amount: Decimal,
    },
    /// Hourly pay, pre-multiplied upstream.
    Hourly {
        /// The amount paid.
        rate: Decimal,
    },
    /// Per-session class fee.
    PerSession {
        /// Fee per session.
        rate: Decimal,
        /// Optional brackets keyed by session count.
        tiers: Vec<Tier>,
    },
    /// Percentage of personal sales.
    Percentage {
        /// Percent of sales.
        rate: Decimal,
        /// Optional brackets keyed by sales amount.
        tiers: Vec<Tier>,
    },
    /// Percentage of the frozen gross total.
    Deduction {
        /// Percent withheld.
        rate: Decimal,
    },
}

/// Typed parameters plus the warnings raised while narrowing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrowedParameters {
    /// The typed parameters.
    pub parameters: RuleParameters,
    /// Free-text note, if configured.
    pub note: Option<String>,
    /// Missing or non-numeric values that were treated as zero.
    pub warnings: Vec<AuditWarning>,
}

impl RuleParameters {
    /// Narrows effective parameters for a calculation type.
    ///
    /// A value that is absent or not numeric becomes zero and is reported
    /// as a `MISSING_PARAMETER` warning; evaluation never fails on it.
    pub fn from_effective(
        calculation_type: CalculationType,
        effective: &EffectiveParameters,
    ) -> NarrowedParameters {
        let mut warnings = Vec::new();
        let mut number = |key: &str| -> Decimal {
            match effective.decimal(key) {
                Some(value) => value,
                None => {
                    let message = match effective.get(key) {
                        Some(ParameterValue::Text(text)) => {
                            format!("'{}' is not numeric ({:?}); treated as 0", key, text)
                        }
                        Some(ParameterValue::Tiers(_)) => {
                            format!("'{}' holds a tier list; treated as 0", key)
                        }
                        _ => format!("'{}' is not configured; treated as 0", key),
                    };
                    warnings.push(AuditWarning::new("MISSING_PARAMETER", message, "medium"));
                    Decimal::ZERO
                }
            }
        };

        let parameters = match calculation_type {
            CalculationType::BaseSalary
            | CalculationType::Fixed
            | CalculationType::Allowance
            | CalculationType::Etc
            | CalculationType::Bonus => RuleParameters::Flat {
                amount: number(AMOUNT_KEY),
            },
            CalculationType::Hourly => RuleParameters::Hourly {
                rate: number(RATE_KEY),
            },
            CalculationType::ClassFee => {
                let tiers = effective.tiers().to_vec();
                let rate = if tiers.is_empty() {
                    number(RATE_KEY)
                } else {
                    effective.decimal(RATE_KEY).unwrap_or(Decimal::ZERO)
                };
                RuleParameters::PerSession { rate, tiers }
            }
            CalculationType::SalesIncentive
            | CalculationType::PercentageTotal
            | CalculationType::PersonalIncentive
            | CalculationType::PercentagePersonal => {
                let tiers = effective.tiers().to_vec();
                let rate = if tiers.is_empty() {
                    number(RATE_KEY)
                } else {
                    effective.decimal(RATE_KEY).unwrap_or(Decimal::ZERO)
                };
                RuleParameters::Percentage { rate, tiers }
            }
            CalculationType::TaxDeduction => RuleParameters::Deduction {
                rate: number(RATE_KEY),
            },
        };

        NarrowedParameters {
            parameters,
            note: effective
                .text(NOTE_KEY)
                .map(str::trim)
                .filter(|note| !note.is_empty())
                .map(str::to_string),
            warnings,
        }
    }
}

/// Selects the rate of the highest tier whose threshold the value reaches.
///
/// Returns `None` when no tier qualifies. Tier order in configuration does
/// not matter.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::select_tier_rate;
/// use payroll_engine::models::Tier;
/// use rust_decimal::Decimal;
///
/// let tiers = vec![
///     Tier { threshold: Decimal::from(40), rate: Decimal::from(25_000) },
///     Tier { threshold: Decimal::from(0), rate: Decimal::from(20_000) },
/// ];
/// assert_eq!(select_tier_rate(&tiers, Decimal::from(45)), Some(Decimal::from(25_000)));
/// assert_eq!(select_tier_rate(&tiers, Decimal::from(12)), Some(Decimal::from(20_000)));
/// ```
pub fn select_tier_rate(tiers: &[Tier], value: Decimal) -> Option<Decimal> {
    tiers
        .iter()
        .filter(|tier| tier.threshold <= value)
        .max_by(|a, b| a.threshold.cmp(&b.threshold))
        .map(|tier| tier.rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_rule(calculation_type: CalculationType, defaults: ParameterMap) -> CompensationRule {
        CompensationRule {
            id: "rule_001".to_string(),
            name: "테스트 규칙".to_string(),
            calculation_type,
            source_metric: None,
            default_parameters: defaults,
        }
    }

    fn params(entries: &[(&str, ParameterValue)]) -> ParameterMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn overrides_for(rule_id: &str, map: ParameterMap) -> BTreeMap<String, ParameterMap> {
        BTreeMap::from([(rule_id.to_string(), map)])
    }

    #[test]
    fn test_defaults_used_without_override() {
        let rule = create_rule(
            CalculationType::Allowance,
            params(&[("amount", ParameterValue::Number(dec("100000")))]),
        );
        let effective = resolve_parameters(&rule, &BTreeMap::new());
        assert_eq!(effective.decimal("amount"), Some(dec("100000")));
    }

    #[test]
    fn test_override_wins_and_absent_keys_fall_back() {
        let rule = create_rule(
            CalculationType::ClassFee,
            params(&[
                ("rate", ParameterValue::Number(dec("20000"))),
                ("note", ParameterValue::Text("기본".to_string())),
            ]),
        );
        let overrides = overrides_for(
            "rule_001",
            params(&[("rate", ParameterValue::Number(dec("22000")))]),
        );

        let effective = resolve_parameters(&rule, &overrides);

        assert_eq!(effective.decimal("rate"), Some(dec("22000")));
        assert_eq!(effective.text("note"), Some("기본"));
    }

    #[test]
    fn test_overrides_for_other_rules_are_ignored() {
        let rule = create_rule(
            CalculationType::Bonus,
            params(&[("amount", ParameterValue::Number(dec("50000")))]),
        );
        let overrides = overrides_for(
            "another_rule",
            params(&[("amount", ParameterValue::Number(dec("1")))]),
        );

        let effective = resolve_parameters(&rule, &overrides);
        assert_eq!(effective.decimal("amount"), Some(dec("50000")));
    }

    #[test]
    fn test_tiers_replaced_wholesale() {
        let rule = create_rule(
            CalculationType::ClassFee,
            params(&[(
                "tiers",
                ParameterValue::Tiers(vec![
                    Tier {
                        threshold: dec("0"),
                        rate: dec("20000"),
                    },
                    Tier {
                        threshold: dec("40"),
                        rate: dec("25000"),
                    },
                ]),
            )]),
        );
        let overrides = overrides_for(
            "rule_001",
            params(&[(
                "tiers",
                ParameterValue::Tiers(vec![Tier {
                    threshold: dec("10"),
                    rate: dec("30000"),
                }]),
            )]),
        );

        let effective = resolve_parameters(&rule, &overrides);

        assert_eq!(
            effective.tiers(),
            &[Tier {
                threshold: dec("10"),
                rate: dec("30000"),
            }]
        );
    }

    #[test]
    fn test_numeric_text_is_coerced() {
        let rule = create_rule(
            CalculationType::TaxDeduction,
            params(&[
                ("rate", ParameterValue::Text(" 3.3% ".to_string())),
                ("amount", ParameterValue::Text("1,250,000".to_string())),
                ("note", ParameterValue::Text("사업소득 3.3% 원천징수".to_string())),
            ]),
        );

        let effective = resolve_parameters(&rule, &BTreeMap::new());

        assert_eq!(effective.decimal("rate"), Some(dec("3.3")));
        assert_eq!(effective.decimal("amount"), Some(dec("1250000")));
        assert_eq!(effective.text("note"), Some("사업소득 3.3% 원천징수"));
    }

    #[test]
    fn test_parse_numeric_rejects_text() {
        assert_eq!(parse_numeric("abc"), None);
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("%"), None);
        assert_eq!(parse_numeric("-500"), Some(dec("-500")));
    }

    #[test]
    fn test_narrow_flat_types() {
        let effective = EffectiveParameters::from(params(&[(
            "amount",
            ParameterValue::Number(dec("2500000")),
        )]));

        let narrowed = RuleParameters::from_effective(CalculationType::BaseSalary, &effective);

        assert_eq!(
            narrowed.parameters,
            RuleParameters::Flat {
                amount: dec("2500000")
            }
        );
        assert!(narrowed.warnings.is_empty());
        assert!(narrowed.note.is_none());
    }

    #[test]
    fn test_narrow_missing_rate_is_zero_with_warning() {
        let narrowed = RuleParameters::from_effective(
            CalculationType::TaxDeduction,
            &EffectiveParameters::default(),
        );

        assert_eq!(
            narrowed.parameters,
            RuleParameters::Deduction {
                rate: Decimal::ZERO
            }
        );
        assert_eq!(narrowed.warnings.len(), 1);
        assert_eq!(narrowed.warnings[0].code, "MISSING_PARAMETER");
        assert!(narrowed.warnings[0].message.contains("'rate'"));
    }

    #[test]
    fn test_narrow_non_numeric_text_is_zero_with_warning() {
        let effective = EffectiveParameters::from(params(&[(
            "amount",
            ParameterValue::Text("협의".to_string()),
        )]));

        let narrowed = RuleParameters::from_effective(CalculationType::Etc, &effective);

        assert_eq!(
            narrowed.parameters,
            RuleParameters::Flat {
                amount: Decimal::ZERO
            }
        );
        assert!(narrowed.warnings[0].message.contains("not numeric"));
    }

    #[test]
    fn test_narrow_tiered_class_fee_does_not_require_rate() {
        let effective = EffectiveParameters::from(params(&[(
            "tiers",
            ParameterValue::Tiers(vec![Tier {
                threshold: dec("0"),
                rate: dec("20000"),
            }]),
        )]));

        let narrowed = RuleParameters::from_effective(CalculationType::ClassFee, &effective);

        match narrowed.parameters {
            RuleParameters::PerSession { rate, tiers } => {
                assert_eq!(rate, Decimal::ZERO);
                assert_eq!(tiers.len(), 1);
            }
            other => panic!("Expected PerSession, got {:?}", other),
        }
        assert!(narrowed.warnings.is_empty());
    }

    #[test]
    fn test_narrow_keeps_note() {
        let effective = EffectiveParameters::from(params(&[
            ("amount", ParameterValue::Number(dec("30000"))),
            ("note", ParameterValue::Text("  교통비  ".to_string())),
        ]));

        let narrowed = RuleParameters::from_effective(CalculationType::Allowance, &effective);
        assert_eq!(narrowed.note.as_deref(), Some("교통비"));
    }

    #[test]
    fn test_select_tier_rate_without_qualifying_tier() {
        let tiers = vec![Tier {
            threshold: dec("10"),
            rate: dec("30000"),
        }];
        assert_eq!(select_tier_rate(&tiers, dec("9")), None);
        assert_eq!(select_tier_rate(&tiers, dec("10")), Some(dec("30000")));
        assert_eq!(select_tier_rate(&[], dec("100")), None);
    }
}
