//! Staff member model.

use serde::{Deserialize, Serialize};

/// A staff member payroll is computed for.
///
/// Staff records are owned by the surrounding back-office system and are
/// read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Unique identifier for the staff member.
    pub id: String,
    /// Display name, also used to match payment registrar names.
    pub name: String,
    /// Job title (e.g., "트레이너", "팀장").
    #[serde(default)]
    pub job_title: String,
}

impl StaffMember {
    /// Creates a staff member.
    pub fn new(id: impl Into<String>, name: impl Into<String>, job_title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            job_title: job_title.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_staff_member_without_title() {
        let json = r#"{ "id": "staff_001", "name": "김민수" }"#;
        let staff: StaffMember = serde_json::from_str(json).unwrap();
        assert_eq!(staff.id, "staff_001");
        assert_eq!(staff.name, "김민수");
        assert!(staff.job_title.is_empty());
    }
}
