//! Attendance export service
//!
//! Validates an export request, pulls the class, its sections and the scoped
//! attendance events from the store, runs the aggregation pipeline and renders
//! the workbook. Every error is raised before rendering starts.

use crate::core::{AttendanceAggregator, DayIndex, MatrixBuilder, MatrixRow};
use crate::error::{AttendanceError, AttendanceResult};
use crate::excel::SpreadsheetRenderer;
use crate::store::AttendanceStore;
use crate::types::{ClassRecord, ExportFormat, ExportScope, Section};
use serde::Deserialize;
use tracing::{info, warn};

/// Parameters of an export call, as received from the request surface
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub class_id: Option<String>,
    pub section_id: Option<String>,
    pub format: Option<String>,
}

impl ExportRequest {
    pub fn new(class_id: impl Into<String>, section_id: Option<&str>) -> Self {
        Self {
            class_id: Some(class_id.into()),
            section_id: section_id.map(str::to_string),
            format: Some("excel".to_string()),
        }
    }
}

/// Aggregated attendance for one class/section scope, ready to render
#[derive(Debug, Clone)]
pub struct AttendanceMatrix {
    pub class: ClassRecord,
    pub section_filter: Option<String>,
    pub sections: Vec<Section>,
    pub days: DayIndex,
    pub rows: Vec<MatrixRow>,
}

impl AttendanceMatrix {
    /// Human-readable scope, e.g. "class c1, section all"
    pub fn scope_label(&self) -> String {
        format!(
            "class {}, section {}",
            self.class.id,
            self.section_filter.as_deref().unwrap_or("all")
        )
    }
}

/// A finished export document
#[derive(Debug, Clone)]
pub struct ExportedWorkbook {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    pub students: usize,
    pub sections: usize,
    pub days: usize,
}

/// `attendance-icons-<classId>[-section-<sectionId>|-allSections].xlsx`
pub fn export_filename(
    class_id: &str,
    section_id: Option<&str>,
    format: ExportFormat,
) -> String {
    let scope = match section_id {
        Some(id) => format!("-section-{}", id),
        None => "-allSections".to_string(),
    };
    format!("attendance-icons-{}{}.{}", class_id, scope, format.extension())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve a class/section scope and aggregate it into matrix rows.
pub async fn build_matrix(
    store: &dyn AttendanceStore,
    class_id: &str,
    section_id: Option<&str>,
) -> AttendanceResult<AttendanceMatrix> {
    let section_id = non_blank(section_id);

    let class = store
        .find_class(class_id)
        .await?
        .ok_or_else(|| AttendanceError::NotFound("Class not found".to_string()))?;

    let sections = store.find_sections(&class.id, section_id).await?;
    if sections.is_empty() {
        return Err(AttendanceError::NotFound(
            "No sections found for this class".to_string(),
        ));
    }

    let scope = ExportScope::new(class.id.clone(), &sections);
    let events = store.find_events(&class.id, &scope.section_ids).await?;

    let days = DayIndex::build(&scope, &events);
    if days.is_defaulted() {
        warn!(
            class_id = %class.id,
            section_id = section_id.unwrap_or("all"),
            "No attendance days found, defaulting to Day 1"
        );
    }

    let summaries = AttendanceAggregator::new(&scope).aggregate(&events);
    let rows = MatrixBuilder::new(&sections, &days, &summaries)
        .build(&class.students);

    Ok(AttendanceMatrix {
        class,
        section_filter: section_id.map(str::to_string),
        sections,
        days,
        rows,
    })
}

/// Run a full export: validate, aggregate, render.
pub async fn export_attendance(
    store: &dyn AttendanceStore,
    request: &ExportRequest,
) -> AttendanceResult<ExportedWorkbook> {
    let class_id = non_blank(request.class_id.as_deref())
        .ok_or_else(|| AttendanceError::BadRequest("Class ID is required".to_string()))?;
    let format = ExportFormat::parse(request.format.as_deref())?;

    let section_id = request.section_id.as_deref();
    let matrix = build_matrix(store, class_id, section_id).await?;

    let bytes = SpreadsheetRenderer::new(&matrix.days)?
        .with_title(format!("Attendance ({})", matrix.scope_label()))
        .render(&matrix.rows)?;

    info!(
        class_id = %matrix.class.id,
        section_id = matrix.section_filter.as_deref().unwrap_or("all"),
        students = matrix.rows.len(),
        sections = matrix.sections.len(),
        days = matrix.days.len(),
        "Attendance exported to Excel"
    );

    Ok(ExportedWorkbook {
        filename: export_filename(
            &matrix.class.id,
            matrix.section_filter.as_deref(),
            format,
        ),
        content_type: format.content_type(),
        bytes,
        students: matrix.rows.len(),
        sections: matrix.sections.len(),
        days: matrix.days.len(),
    })
}
