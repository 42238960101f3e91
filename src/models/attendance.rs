//! Attendance record model and related types.
//!
//! Attendance records are schedule facts produced upstream by the
//! scheduling system. The engine only reads them: the work-time category
//! is already classified and the `locked` flag is set by month finalization.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The kind of schedule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    /// Personal training session.
    #[serde(rename = "PT", alias = "pt")]
    Pt,
    /// Orientation session.
    #[serde(rename = "OT", alias = "ot")]
    Ot,
    /// Membership consulting.
    #[serde(rename = "Consulting", alias = "consulting")]
    Consulting,
    /// Group exercise class.
    #[serde(rename = "GX", alias = "gx")]
    Gx,
    /// Personal (non-session) time.
    #[serde(rename = "Personal", alias = "personal")]
    Personal,
    /// Any other record type; ignored by the statistics aggregator.
    #[serde(other)]
    Other,
}

/// Work-time category assigned to a record by the upstream classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkTimeCategory {
    /// Within the staff member's contracted working hours.
    Inside,
    /// Outside contracted hours on a weekday.
    Outside,
    /// Saturday or Sunday.
    Weekend,
    /// Public holiday.
    Holiday,
}

/// Completion outcome of a scheduled session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Booked but not yet held.
    Reserved,
    /// Held as planned.
    Completed,
    /// Member did not attend and no session was deducted.
    NoShow,
    /// Member did not attend and the session was deducted from their allotment.
    NoShowDeducted,
    /// Complimentary session that still consumed trainer time.
    Service,
    /// Cancelled in advance.
    Cancelled,
    /// Converted into another booking.
    Converted,
}

impl SessionStatus {
    /// Returns true for outcomes that count as a delivered session.
    ///
    /// Only delivered sessions feed volume-based pay: completed, service,
    /// and deducted no-shows.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::SessionStatus;
    ///
    /// assert!(SessionStatus::NoShowDeducted.is_delivered());
    /// assert!(!SessionStatus::NoShow.is_delivered());
    /// ```
    pub fn is_delivered(self) -> bool {
        matches!(
            self,
            SessionStatus::Completed | SessionStatus::Service | SessionStatus::NoShowDeducted
        )
    }
}

/// A single schedule fact for one staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier for the record.
    pub id: String,
    /// The staff member the record belongs to.
    pub staff_id: String,
    /// Record type discriminator.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Work-time category, already classified upstream.
    pub category: WorkTimeCategory,
    /// Completion outcome.
    pub status: SessionStatus,
    /// Whether the record has been finalized for payroll.
    #[serde(default)]
    pub locked: bool,
    /// OT only: whether an InBody measurement was included.
    #[serde(default)]
    pub inbody: bool,
    /// PT only: whether the session belongs to the body challenge program.
    #[serde(default)]
    pub body_challenge: bool,
    /// Start of the scheduled block.
    pub start_time: NaiveDateTime,
    /// End of the scheduled block.
    pub end_time: NaiveDateTime,
}

impl AttendanceRecord {
    /// Returns the record duration in hours, or zero when the end precedes the start.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{AttendanceRecord, RecordType, SessionStatus, WorkTimeCategory};
    /// use chrono::NaiveDateTime;
    /// use rust_decimal::Decimal;
    ///
    /// let record = AttendanceRecord {
    ///     id: "rec_001".to_string(),
    ///     staff_id: "staff_001".to_string(),
    ///     record_type: RecordType::Personal,
    ///     category: WorkTimeCategory::Inside,
    ///     status: SessionStatus::Completed,
    ///     locked: true,
    ///     inbody: false,
    ///     body_challenge: false,
    ///     start_time: NaiveDateTime::parse_from_str("2025-03-04 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    ///     end_time: NaiveDateTime::parse_from_str("2025-03-04 11:30:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    /// };
    /// assert_eq!(record.duration_hours(), Decimal::new(15, 1));
    /// ```
    pub fn duration_hours(&self) -> Decimal {
        Decimal::from(self.duration_minutes()) / Decimal::from(60)
    }

    /// Whole minutes between start and end; zero for inverted ranges.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes().max(0)
    }

    /// Returns true when the end time precedes the start time.
    pub fn is_inverted(&self) -> bool {
        self.end_time < self.start_time
    }
}
