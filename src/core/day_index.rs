//! Day index: the ordered list of session day numbers covered by an export

use crate::types::{AttendanceEvent, ExportScope};
use std::collections::BTreeSet;

/// Day used when no attendance has been recorded for the scope yet
pub const DEFAULT_DAY: u32 = 1;

/// Strictly increasing, deduplicated day numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayIndex {
    days: Vec<u32>,
    defaulted: bool,
}

impl DayIndex {
    /// Collect the distinct day numbers of all scoped events (any status).
    ///
    /// An empty result is replaced by `[DEFAULT_DAY]`; check
    /// [`DayIndex::is_defaulted`] to report the substitution.
    pub fn build(scope: &ExportScope, events: &[AttendanceEvent]) -> Self {
        let days: BTreeSet<u32> = events
            .iter()
            .filter(|event| scope.contains(event))
            .map(|event| event.day_number)
            .collect();

        if days.is_empty() {
            return Self {
                days: vec![DEFAULT_DAY],
                defaulted: true,
            };
        }

        Self {
            days: days.into_iter().collect(),
            defaulted: false,
        }
    }

    pub fn days(&self) -> &[u32] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Always false: an index holds at least the default day
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn is_defaulted(&self) -> bool {
        self.defaulted
    }

    /// Column labels ("Day N") in index order
    pub fn labels(&self) -> Vec<String> {
        self.days.iter().map(|day| format!("Day {}", day)).collect()
    }
}
