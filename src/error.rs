//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Errors are reserved for configuration loading and API misuse; an
//! incomplete rule setup never fails a payroll computation, it degrades
//! to zero amounts with audit warnings instead.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/rules.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/rules.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A template referenced a rule id that is not in the rule catalog.
    #[error("Compensation rule not found: {rule_id}")]
    RuleNotFound {
        /// The rule id that was not found.
        rule_id: String,
    },

    /// An assignment referenced a template id that does not exist.
    #[error("Compensation template not found: {template_id}")]
    TemplateNotFound {
        /// The template id that was not found.
        template_id: String,
    },

    /// Two rules in the catalog share an id.
    #[error("Compensation rule id '{rule_id}' is defined more than once")]
    DuplicateRule {
        /// The repeated rule id.
        rule_id: String,
    },

    /// Two templates share an id.
    #[error("Compensation template id '{template_id}' is defined more than once")]
    DuplicateTemplate {
        /// The repeated template id.
        template_id: String,
    },

    /// A staff member was assigned more than one template.
    #[error("Staff member '{staff_id}' has more than one compensation assignment")]
    DuplicateAssignment {
        /// The staff id with conflicting assignments.
        staff_id: String,
    },

    /// A payroll month string could not be parsed.
    #[error("Invalid payroll month '{value}': expected YYYY-MM")]
    InvalidMonth {
        /// The offending input.
        value: String,
    },

    /// A deduction rule was evaluated before gross pay was frozen.
    #[error("Deduction rule '{rule_id}' can only be evaluated against a frozen gross total")]
    DeductionOutsidePhase {
        /// The id of the deduction rule.
        rule_id: String,
    },

    /// A non-deduction rule was passed to deduction evaluation.
    #[error("Rule '{rule_id}' is not a deduction rule")]
    NotADeduction {
        /// The id of the rule.
        rule_id: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
