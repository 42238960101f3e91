//! Configuration loading and management for the payroll engine.
//!
//! This module loads the compensation setup from YAML files: the rule
//! catalog, the templates that bundle rules in order, and the per-staff
//! assignments carrying personal parameter overrides.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/sample").unwrap();
//! println!("Loaded {} rules", loader.config().rules().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AssignmentsFile, CompensationConfig, RuleCatalogFile, TemplateDefinition, TemplatesFile,
};
