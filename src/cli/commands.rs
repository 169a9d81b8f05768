use crate::core::MatrixRow;
use crate::error::{AttendanceError, AttendanceResult};
use crate::export::{build_matrix, export_attendance, AttendanceMatrix, ExportRequest};
use crate::store::InMemoryStore;
use crate::types::DayCell;
use colored::{ColoredString, Colorize};
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Format a stored percentage (0-100) the way the sheet displays it
fn format_percentage(percentage: f64) -> String {
    format!("{:.2}%", percentage)
}

/// One-letter terminal rendering of a day cell
fn cell_letter(cell: DayCell) -> ColoredString {
    match cell {
        DayCell::Present => "P".green().bold(),
        DayCell::Absent => "A".red().bold(),
        DayCell::Late => "L".yellow().bold(),
        DayCell::NotEnrolled => "-".dimmed(),
    }
}

/// Drive an async store call from the synchronous CLI
fn block_on<F: Future>(future: F) -> AttendanceResult<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

fn load_matrix(
    data: &Path,
    class: &str,
    section: Option<&str>,
) -> AttendanceResult<AttendanceMatrix> {
    let store = InMemoryStore::load(data)?;
    block_on(build_matrix(&store, class, section))?
}

/// Execute the export command
pub fn export(
    data: PathBuf,
    class: String,
    section: Option<String>,
    format: String,
    output: Option<PathBuf>,
    verbose: bool,
) -> AttendanceResult<()> {
    println!("{}", "📋 Attendance - Excel Export".bold().green());
    println!("   Dataset: {}", data.display());
    println!(
        "   Class:   {} (section: {})\n",
        class,
        section.as_deref().unwrap_or("all")
    );

    if verbose {
        println!("{}", "📖 Loading dataset...".cyan());
    }
    let store = InMemoryStore::load(&data)?;

    let request = ExportRequest {
        class_id: Some(class),
        section_id: section,
        format: Some(format),
    };
    let workbook = block_on(export_attendance(&store, &request))??;

    if verbose {
        println!(
            "   Found {} students, {} sections, {} days\n",
            workbook.students, workbook.sections, workbook.days
        );
    }

    let output = output.unwrap_or_else(|| PathBuf::from(&workbook.filename));
    fs::write(&output, &workbook.bytes).map_err(|e| {
        AttendanceError::Export(format!("Failed to write {}: {}", output.display(), e))
    })?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}", output.display());
    println!(
        "   {} students × {} days ({} sections)\n",
        workbook.students, workbook.days, workbook.sections
    );

    Ok(())
}

/// Execute the days command: print the day index for a scope
pub fn days(data: PathBuf, class: String, section: Option<String>) -> AttendanceResult<()> {
    let matrix = load_matrix(&data, &class, section.as_deref())?;

    println!(
        "{}",
        format!("📅 Attendance days: {}", matrix.scope_label())
            .bold()
            .green()
    );
    let days: Vec<String> = matrix.days.days().iter().map(u32::to_string).collect();
    println!("   {}", days.join(", "));

    if matrix.days.is_defaulted() {
        println!("   {}", "⚠️  No records yet, defaulting to Day 1".yellow());
    }
    println!();
    Ok(())
}

/// Execute the summary command: print the attendance matrix
pub fn summary(data: PathBuf, class: String, section: Option<String>) -> AttendanceResult<()> {
    let matrix = load_matrix(&data, &class, section.as_deref())?;

    println!(
        "{}",
        format!("📊 Attendance summary: {}", matrix.scope_label())
            .bold()
            .green()
    );
    println!(
        "   {} students, {} sections, {} days\n",
        matrix.rows.len(),
        matrix.sections.len(),
        matrix.days.len()
    );

    let day_headers: Vec<String> = matrix
        .days
        .days()
        .iter()
        .map(|d| format!("D{}", d))
        .collect();
    println!(
        "   {:<12} {:<24} {:<10} {}  {:>5} {:>8}",
        "Student ID".bold(),
        "Name".bold(),
        "Section".bold(),
        day_headers.join(" ").bold(),
        "P+L".bold(),
        "%".bold()
    );
    let widths: Vec<usize> = day_headers.iter().map(String::len).collect();
    for row in &matrix.rows {
        println!("   {}", summary_line(row, &widths));
    }
    println!();
    Ok(())
}

/// One table line; `widths` are the printed widths of the day headers
fn summary_line(row: &MatrixRow, widths: &[usize]) -> String {
    let cells: Vec<String> = row
        .cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            format!("{}{}", cell_letter(*cell), " ".repeat(width.saturating_sub(1)))
        })
        .collect();
    format!(
        "{:<12} {:<24} {:<10} {}  {:>5} {:>8}",
        row.student_id,
        row.name,
        row.section_display(),
        cells.join(" "),
        row.total,
        format_percentage(row.percentage)
    )
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod commands_tests;
