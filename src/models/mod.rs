//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod compensation;
mod month;
mod payment;
mod payroll_result;
mod staff;
mod statistics;

pub use attendance::{AttendanceRecord, RecordType, SessionStatus, WorkTimeCategory};
pub use compensation::{
    CalculationType, CompensationRule, CompensationTemplate, ParameterMap, ParameterValue,
    RuleBucket, SourceMetric, StaffCompensationAssignment, Tier,
};
pub use month::PayrollMonth;
pub use payment::{PT_PAYMENT_CATEGORY, PaymentRecord};
pub use payroll_result::{
    AuditStep, AuditTrace, AuditWarning, LineItem, NOT_CONFIGURED_LABEL, PayrollResult,
};
pub use staff::StaffMember;
pub use statistics::MonthlyAttendanceStatistics;
