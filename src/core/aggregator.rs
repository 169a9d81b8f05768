//! Attendance aggregation
//!
//! Collapses raw attendance events into one summary per student: the
//! (section, day, status) slots attended plus present/late counters.

use crate::types::{AttendanceEvent, AttendanceStatus, ExportScope};
use std::collections::BTreeMap;

/// One attended (section, day) slot for a student
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendedEntry {
    pub section_id: String,
    pub day_number: u32,
    pub status: AttendanceStatus,
}

/// Per-student result of aggregation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceSummary {
    /// Attended slots ordered by day, then section id
    pub attended: Vec<AttendedEntry>,
    pub present: usize,
    pub late: usize,
}

impl AttendanceSummary {
    /// Sessions counted as attended (present + late)
    pub fn total(&self) -> usize {
        self.present + self.late
    }

    /// Status recorded for `day` in `section_id`, if the student attended it
    pub fn status_in(&self, section_id: &str, day: u32) -> Option<AttendanceStatus> {
        self.attended
            .iter()
            .find(|entry| entry.day_number == day && entry.section_id == section_id)
            .map(|entry| entry.status)
    }
}

/// Summaries keyed by internal student id. Students without any attended
/// slot have no entry.
pub type SummaryByStudent = BTreeMap<String, AttendanceSummary>;

/// Builds [`AttendanceSummary`] values for a single export scope
pub struct AttendanceAggregator<'a> {
    scope: &'a ExportScope,
}

impl<'a> AttendanceAggregator<'a> {
    pub fn new(scope: &'a ExportScope) -> Self {
        Self { scope }
    }

    /// Aggregate `events` into per-student summaries.
    ///
    /// Only present/late events inside the scope are considered. When several
    /// events share a (student, section, day) slot, the earliest `recorded_at`
    /// wins; events with equal timestamps keep the order they were given in.
    pub fn aggregate(&self, events: &[AttendanceEvent]) -> SummaryByStudent {
        let mut candidates: Vec<&AttendanceEvent> = events
            .iter()
            .filter(|event| self.scope.contains(event) && event.status.is_attended())
            .collect();

        // Stable: ties on recorded_at keep input order
        candidates.sort_by_key(|event| event.recorded_at);

        let mut slots: BTreeMap<(&str, u32, &str), AttendanceStatus> = BTreeMap::new();
        for event in candidates {
            slots
                .entry((
                    event.student_id.as_str(),
                    event.day_number,
                    event.section_id.as_str(),
                ))
                .or_insert(event.status);
        }

        let mut summaries = SummaryByStudent::new();
        for ((student_id, day_number, section_id), status) in slots {
            let summary = summaries.entry(student_id.to_string()).or_default();
            match status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Late => summary.late += 1,
                AttendanceStatus::Absent => {}
            }
            summary.attended.push(AttendedEntry {
                section_id: section_id.to_string(),
                day_number,
                status,
            });
        }

        summaries
    }
}
