//! CLI command handlers

pub mod commands;

pub use commands::{days, export, summary};
