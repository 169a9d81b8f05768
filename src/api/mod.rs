//! Attendance API Server module
//!
//! Provides the HTTP REST API for the attendance export.
//! Run with `attendance-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig, AppState};
