//! Spreadsheet renderer for the attendance matrix

use super::layout::{
    SheetLayout, BAND_ROW, DAY_COLUMN_WIDTH, FIRST_DATA_ROW, HEADER_ROW, IDENTITY_COLUMNS,
    PERCENTAGE_COLUMN_WIDTH, PERCENTAGE_HEADER, TOTAL_COLUMN_WIDTH, TOTAL_HEADER,
};
use crate::core::{DayIndex, MatrixRow};
use crate::error::{AttendanceError, AttendanceResult};
use crate::types::DayCell;
use rust_xlsxwriter::{
    Color, DocProperties, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError,
};

pub const SHEET_NAME: &str = "Attendance";

const HEADER_BG: u32 = 0xD3D3D3;
const DEFAULT_FONT: u32 = 0x000000;
const DAY_FONT_SIZE: f64 = 12.0;
const BAND_FONT_SIZE: f64 = 14.0;

/// Background fill and font colour for a day cell. Not-enrolled cells have no fill.
pub fn cell_colors(cell: DayCell) -> (Option<u32>, u32) {
    match cell {
        DayCell::Present => (Some(0xC6EFCE), 0x006100),
        DayCell::Absent => (Some(0xFFC7CE), 0x9C0006),
        DayCell::Late => (Some(0xFFEB9C), 0x9C6500),
        DayCell::NotEnrolled => (None, 0x808080),
    }
}

fn export_error(context: &'static str) -> impl Fn(XlsxError) -> AttendanceError {
    move |e| AttendanceError::Export(format!("{}: {}", context, e))
}

/// Reusable formats, built once per render
struct SheetFormats {
    band: Format,
    header: Format,
    text: Format,
    centered: Format,
    percentage: Format,
    present: Format,
    absent: Format,
    late: Format,
    not_enrolled: Format,
}

impl SheetFormats {
    fn new() -> Self {
        let band = Format::new()
            .set_bold()
            .set_font_size(BAND_FONT_SIZE)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_background_color(Color::RGB(HEADER_BG));

        let header = Format::new()
            .set_bold()
            .set_font_color(Color::RGB(DEFAULT_FONT))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_background_color(Color::RGB(HEADER_BG))
            .set_border_bottom(FormatBorder::Medium);

        let text = Format::new()
            .set_font_color(Color::RGB(DEFAULT_FONT))
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin);

        let centered = Format::new()
            .set_font_color(Color::RGB(DEFAULT_FONT))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin);

        let percentage = centered.clone().set_num_format("0.00%");

        Self {
            band,
            header,
            text,
            centered,
            percentage,
            present: Self::day(DayCell::Present),
            absent: Self::day(DayCell::Absent),
            late: Self::day(DayCell::Late),
            not_enrolled: Self::day(DayCell::NotEnrolled),
        }
    }

    fn day(cell: DayCell) -> Format {
        let (fill, font) = cell_colors(cell);
        let format = Format::new()
            .set_font_size(DAY_FONT_SIZE)
            .set_font_color(Color::RGB(font))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin);
        match fill {
            Some(color) => format.set_background_color(Color::RGB(color)),
            None => format,
        }
    }

    fn for_cell(&self, cell: DayCell) -> &Format {
        match cell {
            DayCell::Present => &self.present,
            DayCell::Absent => &self.absent,
            DayCell::Late => &self.late,
            DayCell::NotEnrolled => &self.not_enrolled,
        }
    }
}

/// Renders matrix rows into an in-memory `.xlsx` document
pub struct SpreadsheetRenderer<'a> {
    days: &'a DayIndex,
    layout: SheetLayout,
    title: String,
}

impl<'a> SpreadsheetRenderer<'a> {
    pub fn new(days: &'a DayIndex) -> AttendanceResult<Self> {
        Ok(Self {
            days,
            layout: SheetLayout::new(days.len())?,
            title: "Attendance".to_string(),
        })
    }

    /// Document title stored in the workbook properties (class/section scope)
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Build the complete workbook and return its bytes. Nothing is returned
    /// unless every row was written.
    pub fn render(&self, rows: &[MatrixRow]) -> AttendanceResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let properties = DocProperties::new()
            .set_title(&self.title)
            .set_subject("Class attendance export");
        workbook.set_properties(&properties);

        let formats = SheetFormats::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(SHEET_NAME)
            .map_err(export_error("Failed to set worksheet name"))?;

        self.write_bands(worksheet, &formats)?;
        self.write_headers(worksheet, &formats)?;
        self.set_column_widths(worksheet)?;

        let (freeze_row, freeze_col) = self.layout.freeze_panes();
        worksheet
            .set_freeze_panes(freeze_row, freeze_col)
            .map_err(export_error("Failed to freeze panes"))?;

        for (idx, row) in rows.iter().enumerate() {
            self.write_row(worksheet, FIRST_DATA_ROW + idx as u32, row, &formats)?;
        }

        workbook
            .save_to_buffer()
            .map_err(export_error("Failed to build Excel document"))
    }

    fn write_bands(
        &self,
        worksheet: &mut Worksheet,
        formats: &SheetFormats,
    ) -> AttendanceResult<()> {
        for band in [self.layout.student_band(), self.layout.attendance_band()] {
            worksheet
                .merge_range(
                    BAND_ROW,
                    band.first_col,
                    BAND_ROW,
                    band.last_col,
                    band.title,
                    &formats.band,
                )
                .map_err(export_error("Failed to merge header band"))?;
        }
        Ok(())
    }

    fn write_headers(
        &self,
        worksheet: &mut Worksheet,
        formats: &SheetFormats,
    ) -> AttendanceResult<()> {
        let headers = IDENTITY_COLUMNS
            .iter()
            .map(|(header, _)| header.to_string())
            .chain(self.days.labels())
            .chain([TOTAL_HEADER.to_string(), PERCENTAGE_HEADER.to_string()]);

        for (col, header) in headers.enumerate() {
            worksheet
                .write_string_with_format(HEADER_ROW, col as u16, header, &formats.header)
                .map_err(export_error("Failed to write header"))?;
        }
        Ok(())
    }

    fn set_column_widths(&self, worksheet: &mut Worksheet) -> AttendanceResult<()> {
        let widths = IDENTITY_COLUMNS
            .iter()
            .map(|(_, width)| *width)
            .chain((0..self.layout.day_count()).map(|_| DAY_COLUMN_WIDTH))
            .chain([TOTAL_COLUMN_WIDTH, PERCENTAGE_COLUMN_WIDTH]);

        for (col, width) in widths.enumerate() {
            worksheet
                .set_column_width(col as u16, width)
                .map_err(export_error("Failed to set column width"))?;
        }
        Ok(())
    }

    fn write_row(
        &self,
        worksheet: &mut Worksheet,
        excel_row: u32,
        row: &MatrixRow,
        formats: &SheetFormats,
    ) -> AttendanceResult<()> {
        let err = |e: XlsxError| {
            AttendanceError::Export(format!("Failed to write row {}: {}", excel_row + 1, e))
        };

        worksheet
            .write_string_with_format(excel_row, 0, &row.student_id, &formats.text)
            .map_err(err)?;
        worksheet
            .write_string_with_format(excel_row, 1, &row.name, &formats.text)
            .map_err(err)?;
        worksheet
            .write_string_with_format(excel_row, 2, &row.email, &formats.text)
            .map_err(err)?;
        worksheet
            .write_string_with_format(
                excel_row,
                3,
                row.section_display(),
                &formats.centered,
            )
            .map_err(err)?;

        for (idx, cell) in row.cells.iter().enumerate() {
            worksheet
                .write_string_with_format(
                    excel_row,
                    self.layout.day_col(idx as u16),
                    cell.glyph(),
                    formats.for_cell(*cell),
                )
                .map_err(err)?;
        }

        worksheet
            .write_number_with_format(
                excel_row,
                self.layout.total_col(),
                row.total as f64,
                &formats.centered,
            )
            .map_err(err)?;
        worksheet
            .write_number_with_format(
                excel_row,
                self.layout.percentage_col(),
                row.attendance_fraction(),
                &formats.percentage,
            )
            .map_err(err)?;

        Ok(())
    }
}
