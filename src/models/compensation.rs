//! Compensation rule, template, and assignment models.
//!
//! A [`CompensationRule`] is a named calculation strategy with default
//! parameters. Rules are bundled in order into a [`CompensationTemplate`],
//! and a [`StaffCompensationAssignment`] binds one template to one staff
//! member together with that member's personal parameter overrides.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The calculation strategy of a rule.
///
/// Some strategies share a formula but keep distinct labels for reporting
/// (e.g. `sales_incentive` and `personal_incentive`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationType {
    /// Monthly base salary, flat `amount`.
    BaseSalary,
    /// Fixed monthly payment, flat `amount`.
    Fixed,
    /// Allowance, flat `amount`.
    Allowance,
    /// Hourly pay with `rate` pre-multiplied upstream.
    Hourly,
    /// Miscellaneous flat `amount`.
    Etc,
    /// Per-session class fee, `count × rate`.
    ClassFee,
    /// Percentage of personal sales.
    SalesIncentive,
    /// Percentage of personal sales (legacy label).
    PercentageTotal,
    /// Percentage of personal sales, reported as a personal incentive.
    PersonalIncentive,
    /// Percentage of personal sales (legacy label).
    PercentagePersonal,
    /// Flat bonus `amount`.
    Bonus,
    /// Percentage of the frozen gross total, withheld.
    TaxDeduction,
}

impl CalculationType {
    /// Returns the bucket this strategy contributes to.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{CalculationType, RuleBucket};
    ///
    /// assert_eq!(CalculationType::Hourly.bucket(), RuleBucket::Base);
    /// assert_eq!(CalculationType::Bonus.bucket(), RuleBucket::Incentive);
    /// assert_eq!(CalculationType::TaxDeduction.bucket(), RuleBucket::Deduction);
    /// ```
    pub fn bucket(self) -> RuleBucket {
        match self {
            CalculationType::BaseSalary
            | CalculationType::Fixed
            | CalculationType::Allowance
            | CalculationType::Hourly
            | CalculationType::Etc => RuleBucket::Base,
            CalculationType::ClassFee => RuleBucket::Class,
            CalculationType::SalesIncentive
            | CalculationType::PercentageTotal
            | CalculationType::PersonalIncentive
            | CalculationType::PercentagePersonal
            | CalculationType::Bonus => RuleBucket::Incentive,
            CalculationType::TaxDeduction => RuleBucket::Deduction,
        }
    }

    /// Returns the snake_case label used in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            CalculationType::BaseSalary => "base_salary",
            CalculationType::Fixed => "fixed",
            CalculationType::Allowance => "allowance",
            CalculationType::Hourly => "hourly",
            CalculationType::Etc => "etc",
            CalculationType::ClassFee => "class_fee",
            CalculationType::SalesIncentive => "sales_incentive",
            CalculationType::PercentageTotal => "percentage_total",
            CalculationType::PersonalIncentive => "personal_incentive",
            CalculationType::PercentagePersonal => "percentage_personal",
            CalculationType::Bonus => "bonus",
            CalculationType::TaxDeduction => "tax_deduction",
        }
    }
}

impl fmt::Display for CalculationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The payroll bucket a rule contributes to.
///
/// Buckets are ordered the way the compositor emits line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleBucket {
    /// Base salary, allowances, hourly and miscellaneous pay.
    Base,
    /// Session-volume class fees.
    Class,
    /// Sales incentives and bonuses.
    Incentive,
    /// Deductions from gross pay.
    Deduction,
}

/// The attendance statistic that feeds a class-fee rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMetric {
    /// Delivered PT sessions inside working hours.
    PtInside,
    /// Delivered PT sessions outside working hours.
    PtOutside,
    /// Delivered PT sessions on weekends.
    PtWeekend,
    /// Delivered PT sessions on public holidays.
    PtHoliday,
    /// All delivered PT sessions.
    PtTotal,
    /// Delivered body challenge PT sessions.
    BodyChallenge,
    /// Delivered OT sessions without InBody.
    OtPlain,
    /// Delivered OT sessions with InBody.
    OtInbody,
    /// All delivered OT sessions.
    OtTotal,
}

/// One bracket of a graduated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// The measured value at which this tier starts applying (inclusive).
    pub threshold: Decimal,
    /// The rate applied once the threshold is reached.
    pub rate: Decimal,
}

/// A raw parameter value as it appears in configuration.
///
/// Numeric-looking text is kept as text until resolution time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// A bracket list; replaced wholesale on override.
    Tiers(Vec<Tier>),
    /// Free text, possibly numeric-looking.
    Text(String),
    /// A number.
    Number(Decimal),
}

impl From<Decimal> for ParameterValue {
    fn from(value: Decimal) -> Self {
        ParameterValue::Number(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

impl From<Vec<Tier>> for ParameterValue {
    fn from(value: Vec<Tier>) -> Self {
        ParameterValue::Tiers(value)
    }
}

/// A raw parameter map keyed by parameter name (`amount`, `rate`, `tiers`, ...).
pub type ParameterMap = BTreeMap<String, ParameterValue>;

/// A reusable, named calculation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationRule {
    /// Unique identifier for the rule.
    pub id: String,
    /// Human-readable name; shown on line items.
    pub name: String,
    /// The calculation strategy.
    pub calculation_type: CalculationType,
    /// Explicit statistic binding for class-fee rules.
    ///
    /// When absent, the statistic is inferred from the rule name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_metric: Option<SourceMetric>,
    /// Parameters used when the staff member has no override.
    #[serde(default)]
    pub default_parameters: ParameterMap,
}

/// An ordered bundle of rules, resolved from the rule catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationTemplate {
    /// Unique identifier for the template.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Rules in template order.
    #[serde(default)]
    pub items: Vec<CompensationRule>,
}

/// Binds a template to a staff member with personal overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StaffCompensationAssignment {
    /// The staff member the assignment belongs to.
    pub staff_id: String,
    /// The assigned template.
    pub template_id: String,
    /// Partial parameter overrides keyed by rule id.
    #[serde(default)]
    pub personal_parameters: BTreeMap<String, ParameterMap>,
}
