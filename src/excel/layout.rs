//! Column layout of the attendance sheet, derived once from the day count

use crate::error::{AttendanceError, AttendanceResult};

/// Excel's column limit (XFD)
const MAX_COLUMNS: usize = 16_384;

/// Header row holding the merged bands
pub const BAND_ROW: u32 = 0;
/// Header row naming every column
pub const HEADER_ROW: u32 = 1;
/// First student row
pub const FIRST_DATA_ROW: u32 = 2;

/// Leading identity columns: (header, width)
pub const IDENTITY_COLUMNS: [(&str, f64); 4] = [
    ("Student ID", 15.0),
    ("Name", 25.0),
    ("Email", 30.0),
    ("Section", 10.0),
];

pub const DAY_COLUMN_WIDTH: f64 = 7.0;
pub const TOTAL_HEADER: &str = "Total P+L";
pub const TOTAL_COLUMN_WIDTH: f64 = 10.0;
pub const PERCENTAGE_HEADER: &str = "Attendance %";
pub const PERCENTAGE_COLUMN_WIDTH: f64 = 12.0;

/// A merged header band spanning `first_col..=last_col`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub title: &'static str,
    pub first_col: u16,
    pub last_col: u16,
}

/// Column positions for a sheet with `day_count` day columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    day_count: u16,
}

impl SheetLayout {
    pub fn new(day_count: usize) -> AttendanceResult<Self> {
        let fixed = IDENTITY_COLUMNS.len() + 2;
        if day_count == 0 || day_count + fixed > MAX_COLUMNS {
            return Err(AttendanceError::Export(format!(
                "Cannot lay out {} day columns (sheet allows 1 to {})",
                day_count,
                MAX_COLUMNS - fixed
            )));
        }
        let day_count = u16::try_from(day_count)
            .map_err(|e| AttendanceError::Export(format!("Invalid day count: {}", e)))?;
        Ok(Self { day_count })
    }

    pub fn day_count(&self) -> u16 {
        self.day_count
    }

    pub fn first_day_col(&self) -> u16 {
        IDENTITY_COLUMNS.len() as u16
    }

    /// Column of the `index`-th day (0-based position in the day index)
    pub fn day_col(&self, index: u16) -> u16 {
        self.first_day_col() + index
    }

    pub fn last_day_col(&self) -> u16 {
        self.first_day_col() + self.day_count - 1
    }

    pub fn total_col(&self) -> u16 {
        self.last_day_col() + 1
    }

    pub fn percentage_col(&self) -> u16 {
        self.total_col() + 1
    }

    /// "Student Data" over the identity and section columns
    pub fn student_band(&self) -> Band {
        Band {
            title: "Student Data",
            first_col: 0,
            last_col: self.first_day_col() - 1,
        }
    }

    /// "Class Attendance" over the day columns and both summary columns
    pub fn attendance_band(&self) -> Band {
        Band {
            title: "Class Attendance",
            first_col: self.first_day_col(),
            last_col: self.percentage_col(),
        }
    }

    /// Freeze point: (rows above, columns left) that stay visible on scroll
    pub fn freeze_panes(&self) -> (u32, u16) {
        (FIRST_DATA_ROW, self.first_day_col())
    }
}
