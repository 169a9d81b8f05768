//! Attendance aggregation pipeline: events → summaries → day index → matrix

pub mod aggregator;
pub mod day_index;
pub mod matrix;

pub use aggregator::{AttendanceAggregator, AttendanceSummary, AttendedEntry, SummaryByStudent};
pub use day_index::{DayIndex, DEFAULT_DAY};
pub use matrix::{MatrixBuilder, MatrixRow, NOT_APPLICABLE};
