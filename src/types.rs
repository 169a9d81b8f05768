use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AttendanceError, AttendanceResult};

//==============================================================================
// Roster Types
//==============================================================================

/// A student as seen by the export (owned by the roster collaborator)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Internal identity used by sections and attendance events
    pub id: String,
    /// Human-readable student number printed in the sheet
    pub student_id: String,
    pub name: String,
    pub email: String,
}

impl Student {
    pub fn new(
        id: impl Into<String>,
        student_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            student_id: student_id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// A class together with its roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub students: Vec<Student>,
}

/// A sub-group of a class (lab, tutorial) with its own membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub class_id: String,
    pub section_number: u32,
    /// Internal ids of member students
    #[serde(default)]
    pub students: Vec<String>,
}

impl Section {
    pub fn has_member(&self, student_id: &str) -> bool {
        self.students.iter().any(|id| id == student_id)
    }
}

//==============================================================================
// Attendance Types
//==============================================================================

/// Status recorded by an attendance event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
        }
    }

    /// Present and late both count towards attendance; absent is never stored
    /// as a positive fact in the summary.
    pub fn is_attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded fact: a student had `status` in a section on a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    pub student_id: String,
    pub section_id: String,
    pub class_id: String,
    pub day_number: u32,
    pub status: AttendanceStatus,
    pub recorded_at: DateTime<Utc>,
}

/// Value of one student/day cell in the attendance matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayCell {
    Present,
    Absent,
    Late,
    /// The student belongs to no section of the class (distinct from absent)
    NotEnrolled,
}

impl DayCell {
    /// Single-glyph encoding written into the spreadsheet
    pub fn glyph(&self) -> &'static str {
        match self {
            DayCell::Present => "✅",
            DayCell::Absent => "❌",
            DayCell::Late => "🕒",
            DayCell::NotEnrolled => "-",
        }
    }
}

impl From<AttendanceStatus> for DayCell {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Present => DayCell::Present,
            AttendanceStatus::Absent => DayCell::Absent,
            AttendanceStatus::Late => DayCell::Late,
        }
    }
}

//==============================================================================
// Export Request Types
//==============================================================================

/// Output formats accepted by the export endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
}

impl ExportFormat {
    /// Parse the `format` request token; only `excel` is supported.
    pub fn parse(token: Option<&str>) -> AttendanceResult<Self> {
        match token.map(str::trim) {
            Some("excel") => Ok(ExportFormat::Excel),
            _ => Err(AttendanceError::BadRequest(
                "Only Excel format is supported".to_string(),
            )),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
        }
    }
}

/// Class plus the resolved set of sections an export covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportScope {
    pub class_id: String,
    pub section_ids: Vec<String>,
}

impl ExportScope {
    pub fn new(class_id: impl Into<String>, sections: &[Section]) -> Self {
        Self {
            class_id: class_id.into(),
            section_ids: sections.iter().map(|s| s.id.clone()).collect(),
        }
    }

    /// True when the event belongs to this class and one of the scoped sections
    pub fn contains(&self, event: &AttendanceEvent) -> bool {
        event.class_id == self.class_id && self.section_ids.contains(&event.section_id)
    }
}
