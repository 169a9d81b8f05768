//! Excel rendering of the attendance matrix
//!
//! The layout module fixes every column position from the day count; the
//! renderer writes bands, headers, status glyphs and summary columns.

pub mod layout;
mod renderer;

pub use layout::{Band, SheetLayout};
pub use renderer::{cell_colors, SpreadsheetRenderer, SHEET_NAME};
