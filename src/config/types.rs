//! Configuration types for compensation setup.
//!
//! This module contains the file structures deserialized from the YAML
//! configuration and the validated [`CompensationConfig`] built from them.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{CompensationRule, CompensationTemplate, StaffCompensationAssignment};

/// Rule catalog file structure (`rules.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct RuleCatalogFile {
    /// Every rule known to the gym.
    pub rules: Vec<CompensationRule>,
}

/// A template as written in configuration, referencing rules by id.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateDefinition {
    /// Unique identifier for the template.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Rule ids in evaluation order.
    #[serde(default)]
    pub items: Vec<String>,
}

/// Templates file structure (`templates.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesFile {
    /// Template definitions.
    pub templates: Vec<TemplateDefinition>,
}

/// Assignments file structure (`assignments.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentsFile {
    /// One assignment per staff member.
    #[serde(default)]
    pub assignments: Vec<StaffCompensationAssignment>,
}

/// The complete, validated compensation configuration.
///
/// Templates hold their rules resolved from the catalog, in item order.
/// Rule and template ids are unique, every assignment references an
/// existing template, and each staff member has at most one assignment.
#[derive(Debug, Clone, Default)]
pub struct CompensationConfig {
    rules: BTreeMap<String, CompensationRule>,
    templates: BTreeMap<String, CompensationTemplate>,
    assignments: BTreeMap<String, StaffCompensationAssignment>,
}

impl CompensationConfig {
    /// Builds a configuration from its parts, resolving template items
    /// against the rule catalog.
    ///
    /// # Errors
    ///
    /// - [`EngineError::RuleNotFound`] if a template names an unknown rule.
    /// - [`EngineError::TemplateNotFound`] if an assignment names an unknown template.
    /// - [`EngineError::DuplicateRule`] or [`EngineError::DuplicateTemplate`]
    ///   if an id is defined twice.
    /// - [`EngineError::DuplicateAssignment`] if a staff member is assigned twice.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::{CompensationConfig, TemplateDefinition};
    /// use payroll_engine::models::{CalculationType, CompensationRule, ParameterMap};
    ///
    /// let rule = CompensationRule {
    ///     id: "base_salary".to_string(),
    ///     name: "기본급".to_string(),
    ///     calculation_type: CalculationType::BaseSalary,
    ///     source_metric: None,
    ///     default_parameters: ParameterMap::new(),
    /// };
    /// let template = TemplateDefinition {
    ///     id: "trainer".to_string(),
    ///     name: "트레이너".to_string(),
    ///     items: vec!["base_salary".to_string(), "missing_rule".to_string()],
    /// };
    ///
    /// let error = CompensationConfig::new(vec![rule], vec![template], vec![]).unwrap_err();
    /// assert_eq!(error.to_string(), "Compensation rule not found: missing_rule");
    /// ```
    pub fn new(
        rules: Vec<CompensationRule>,
        templates: Vec<TemplateDefinition>,
        assignments: Vec<StaffCompensationAssignment>,
    ) -> EngineResult<Self> {
        let mut catalog: BTreeMap<String, CompensationRule> = BTreeMap::new();
        for rule in rules {
            if catalog.contains_key(&rule.id) {
                return Err(EngineError::DuplicateRule { rule_id: rule.id });
            }
            catalog.insert(rule.id.clone(), rule);
        }
        let rules = catalog;

        let mut resolved: BTreeMap<String, CompensationTemplate> = BTreeMap::new();
        for definition in templates {
            if resolved.contains_key(&definition.id) {
                return Err(EngineError::DuplicateTemplate {
                    template_id: definition.id,
                });
            }
            let items = definition
                .items
                .iter()
                .map(|rule_id| {
                    rules
                        .get(rule_id)
                        .cloned()
                        .ok_or_else(|| EngineError::RuleNotFound {
                            rule_id: rule_id.clone(),
                        })
                })
                .collect::<EngineResult<Vec<_>>>()?;

            resolved.insert(
                definition.id.clone(),
                CompensationTemplate {
                    id: definition.id,
                    name: definition.name,
                    items,
                },
            );
        }

        let mut by_staff: BTreeMap<String, StaffCompensationAssignment> = BTreeMap::new();
        for assignment in assignments {
            if !resolved.contains_key(&assignment.template_id) {
                return Err(EngineError::TemplateNotFound {
                    template_id: assignment.template_id,
                });
            }
            if by_staff.contains_key(&assignment.staff_id) {
                return Err(EngineError::DuplicateAssignment {
                    staff_id: assignment.staff_id,
                });
            }
            by_staff.insert(assignment.staff_id.clone(), assignment);
        }

        Ok(Self {
            rules,
            templates: resolved,
            assignments: by_staff,
        })
    }

    /// Gets a rule by id.
    pub fn get_rule(&self, rule_id: &str) -> EngineResult<&CompensationRule> {
        self.rules
            .get(rule_id)
            .ok_or_else(|| EngineError::RuleNotFound {
                rule_id: rule_id.to_string(),
            })
    }

    /// Gets a resolved template by id.
    pub fn get_template(&self, template_id: &str) -> EngineResult<&CompensationTemplate> {
        self.templates
            .get(template_id)
            .ok_or_else(|| EngineError::TemplateNotFound {
                template_id: template_id.to_string(),
            })
    }

    /// Returns a staff member's assignment, if any.
    pub fn assignment_for(&self, staff_id: &str) -> Option<&StaffCompensationAssignment> {
        self.assignments.get(staff_id)
    }

    /// Returns the template assigned to a staff member, if any.
    pub fn template_for(&self, staff_id: &str) -> Option<&CompensationTemplate> {
        self.assignment_for(staff_id)
            .and_then(|assignment| self.templates.get(&assignment.template_id))
    }

    /// Returns the rule catalog.
    pub fn rules(&self) -> &BTreeMap<String, CompensationRule> {
        &self.rules
    }

    /// Returns all resolved templates.
    pub fn templates(&self) -> &BTreeMap<String, CompensationTemplate> {
        &self.templates
    }

    /// Returns all assignments keyed by staff id.
    pub fn assignments(&self) -> &BTreeMap<String, StaffCompensationAssignment> {
        &self.assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalculationType, ParameterMap};

    fn create_rule(id: &str, calculation_type: CalculationType) -> CompensationRule {
        CompensationRule {
            id: id.to_string(),
            name: id.to_string(),
            calculation_type,
            source_metric: None,
            default_parameters: ParameterMap::new(),
        }
    }

    fn definition(id: &str, items: &[&str]) -> TemplateDefinition {
        TemplateDefinition {
            id: id.to_string(),
            name: id.to_string(),
            items: items.iter().map(|item| item.to_string()).collect(),
        }
    }

    fn assignment(staff_id: &str, template_id: &str) -> StaffCompensationAssignment {
        StaffCompensationAssignment {
            staff_id: staff_id.to_string(),
            template_id: template_id.to_string(),
            personal_parameters: Default::default(),
        }
    }

    fn rules() -> Vec<CompensationRule> {
        vec![
            create_rule("base", CalculationType::BaseSalary),
            create_rule("pt_fee", CalculationType::ClassFee),
            create_rule("tax", CalculationType::TaxDeduction),
        ]
    }

    #[test]
    fn test_templates_resolve_rules_in_item_order() {
        let config = CompensationConfig::new(
            rules(),
            vec![definition("trainer", &["tax", "pt_fee", "base"])],
            vec![assignment("staff_001", "trainer")],
        )
        .unwrap();

        let template = config.template_for("staff_001").unwrap();
        let ids: Vec<&str> = template.items.iter().map(|rule| rule.id.as_str()).collect();
        assert_eq!(ids, vec!["tax", "pt_fee", "base"]);
        assert!(config.template_for("staff_002").is_none());
    }

    #[test]
    fn test_unknown_template_in_assignment_is_rejected() {
        let error = CompensationConfig::new(
            rules(),
            vec![definition("trainer", &["base"])],
            vec![assignment("staff_001", "manager")],
        )
        .unwrap_err();

        assert!(matches!(error, EngineError::TemplateNotFound { template_id } if template_id == "manager"));
    }

    #[test]
    fn test_duplicate_assignment_is_rejected() {
        let error = CompensationConfig::new(
            rules(),
            vec![definition("trainer", &["base"])],
            vec![
                assignment("staff_001", "trainer"),
                assignment("staff_001", "trainer"),
            ],
        )
        .unwrap_err();

        assert!(matches!(error, EngineError::DuplicateAssignment { staff_id } if staff_id == "staff_001"));
    }

    #[test]
    fn test_duplicate_rule_id_is_rejected() {
        let mut catalog = rules();
        catalog.push(create_rule("tax", CalculationType::Bonus));

        let error = CompensationConfig::new(catalog, vec![], vec![]).unwrap_err();

        assert!(matches!(error, EngineError::DuplicateRule { rule_id } if rule_id == "tax"));
    }

    #[test]
    fn test_duplicate_template_id_is_rejected() {
        let error = CompensationConfig::new(
            rules(),
            vec![
                definition("trainer", &["base"]),
                definition("trainer", &["pt_fee", "tax"]),
            ],
            vec![],
        )
        .unwrap_err();

        assert!(matches!(error, EngineError::DuplicateTemplate { template_id } if template_id == "trainer"));
    }

    #[test]
    fn test_get_rule_and_template_errors() {
        let config = CompensationConfig::new(rules(), vec![], vec![]).unwrap();

        assert_eq!(config.get_rule("tax").unwrap().id, "tax");
        assert!(matches!(
            config.get_rule("bonus"),
            Err(EngineError::RuleNotFound { .. })
        ));
        assert!(matches!(
            config.get_template("trainer"),
            Err(EngineError::TemplateNotFound { .. })
        ));
    }
}
