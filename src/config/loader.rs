//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the rule
//! catalog, templates, and staff assignments from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{CompensationRule, CompensationTemplate, StaffCompensationAssignment};

use super::types::{AssignmentsFile, CompensationConfig, RuleCatalogFile, TemplatesFile};

/// Loads and provides access to compensation configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/sample/
/// ├── rules.yaml        # Rule catalog
/// ├── templates.yaml    # Templates listing rule ids in order
/// └── assignments.yaml  # Staff assignments and personal overrides
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/sample")?;
/// let template = loader.config().template_for("staff_001");
/// println!("Template: {:?}", template.map(|t| &t.name));
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: CompensationConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any of the three files is missing or is not
    /// valid YAML, or if the files reference each other inconsistently
    /// (see [`CompensationConfig::new`]).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let catalog = Self::load_yaml::<RuleCatalogFile>(&path.join("rules.yaml"))?;
        let templates = Self::load_yaml::<TemplatesFile>(&path.join("templates.yaml"))?;
        let assignments = Self::load_yaml::<AssignmentsFile>(&path.join("assignments.yaml"))?;

        let config =
            CompensationConfig::new(catalog.rules, templates.templates, assignments.assignments)?;

        info!(
            path = %path.display(),
            rules = config.rules().len(),
            templates = config.templates().len(),
            assignments = config.assignments().len(),
            "Loaded compensation configuration"
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &CompensationConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> CompensationConfig {
        self.config
    }

    /// Gets a rule by id.
    pub fn get_rule(&self, rule_id: &str) -> EngineResult<&CompensationRule> {
        self.config.get_rule(rule_id)
    }

    /// Gets a resolved template by id.
    pub fn get_template(&self, template_id: &str) -> EngineResult<&CompensationTemplate> {
        self.config.get_template(template_id)
    }

    /// Returns a staff member's assignment, if any.
    pub fn assignment_for(&self, staff_id: &str) -> Option<&StaffCompensationAssignment> {
        self.config.assignment_for(staff_id)
    }
}
