//! Student × day attendance matrix

use super::aggregator::{AttendanceSummary, SummaryByStudent};
use super::day_index::DayIndex;
use crate::types::{DayCell, Section, Student};
use std::cmp::Ordering;

/// Section display value for students outside every section
pub const NOT_APPLICABLE: &str = "N/A";

/// One exported row: identity, sections, per-day cells and summary columns
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    pub student_id: String,
    pub name: String,
    pub email: String,
    /// Ascending section numbers the student belongs to
    pub section_numbers: Vec<u32>,
    /// One cell per day of the index, in index order
    pub cells: Vec<DayCell>,
    /// Present + late sessions
    pub total: usize,
    /// Attendance percentage in `[0, 100]`
    pub percentage: f64,
}

impl MatrixRow {
    /// Lowest section number, used as the primary sort key
    pub fn primary_section(&self) -> Option<u32> {
        self.section_numbers.first().copied()
    }

    /// "1, 2" style display value, or `N/A` without sections
    pub fn section_display(&self) -> String {
        if self.section_numbers.is_empty() {
            return NOT_APPLICABLE.to_string();
        }
        self.section_numbers
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Percentage as a fraction in `[0, 1]`, the value stored in the sheet
    pub fn attendance_fraction(&self) -> f64 {
        self.percentage / 100.0
    }
}

/// Combines roster, sections, day index and summaries into ordered rows
pub struct MatrixBuilder<'a> {
    sections: &'a [Section],
    days: &'a DayIndex,
    summaries: &'a SummaryByStudent,
}

impl<'a> MatrixBuilder<'a> {
    pub fn new(
        sections: &'a [Section],
        days: &'a DayIndex,
        summaries: &'a SummaryByStudent,
    ) -> Self {
        Self {
            sections,
            days,
            summaries,
        }
    }

    /// Build one row per roster student, sorted by primary section then name.
    pub fn build(&self, roster: &[Student]) -> Vec<MatrixRow> {
        let mut rows: Vec<MatrixRow> = roster
            .iter()
            .map(|student| self.build_row(student))
            .collect();
        rows.sort_by(compare_rows);
        rows
    }

    /// Compute a single student's row. Depends only on shared read-only data.
    pub fn build_row(&self, student: &Student) -> MatrixRow {
        let mut student_sections: Vec<&Section> = self
            .sections
            .iter()
            .filter(|section| section.has_member(&student.id))
            .collect();
        student_sections.sort_by_key(|section| section.section_number);

        let empty = AttendanceSummary::default();
        let summary = self.summaries.get(&student.id).unwrap_or(&empty);

        let total = summary.total();
        let possible = student_sections.len() * self.days.len();
        let percentage = if possible == 0 {
            0.0
        } else {
            (total as f64 / possible as f64 * 100.0).clamp(0.0, 100.0)
        };

        let cells = self
            .days
            .days()
            .iter()
            .map(|&day| day_cell(&student_sections, summary, day))
            .collect();

        // One entry per membership, so the display lines up with `possible`
        let section_numbers: Vec<u32> = student_sections
            .iter()
            .map(|section| section.section_number)
            .collect();

        MatrixRow {
            student_id: student.student_id.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
            section_numbers,
            cells,
            total,
            percentage,
        }
    }
}

/// A student in several sections counts as attending a day if any of their
/// sections recorded them; sections are checked in ascending number order.
fn day_cell(sections: &[&Section], summary: &AttendanceSummary, day: u32) -> DayCell {
    if sections.is_empty() {
        return DayCell::NotEnrolled;
    }
    sections
        .iter()
        .find_map(|section| summary.status_in(&section.id, day))
        .map(DayCell::from)
        .unwrap_or(DayCell::Absent)
}

/// Primary section ascending (no section sorts last), then name
/// case-insensitively, then exact name and student id.
pub fn compare_rows(a: &MatrixRow, b: &MatrixRow) -> Ordering {
    let by_section = match (a.primary_section(), b.primary_section()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_section
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.student_id.cmp(&b.student_id))
}
