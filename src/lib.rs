//! Monthly payroll engine for a fitness-center chain.
//!
//! This crate turns locked attendance records, staff compensation templates,
//! and personal sales figures into itemized, audited monthly payroll
//! results for trainers and other staff.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod payroll;
