//! Attendance - university attendance matrix and Excel export
//!
//! This library aggregates attendance events into a per-student, per-day
//! matrix and renders it as a styled Excel workbook.
//!
//! # Features
//!
//! - Aggregation of present/late events with an explicit duplicate rule
//! - Ordered day index with a default day for classes without records
//! - Status cells encoded as icons with per-status fill and font colours
//! - Total and percentage summary columns
//! - HTTP export endpoint (axum) and CLI over a YAML/JSON dataset
//!
//! # Example
//!
//! ```no_run
//! use attendance_export::export::{export_attendance, ExportRequest};
//! use attendance_export::store::InMemoryStore;
//! use std::path::Path;
//!
//! # async fn run() -> attendance_export::AttendanceResult<()> {
//! let store = InMemoryStore::load(Path::new("attendance.yaml"))?;
//! let workbook = export_attendance(&store, &ExportRequest::new("c1", None)).await?;
//!
//! println!("{}: {} bytes", workbook.filename, workbook.bytes.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod export;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{AttendanceError, AttendanceResult};
pub use types::{AttendanceEvent, AttendanceStatus, ClassRecord, DayCell, Section, Student};
