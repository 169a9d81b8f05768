//! End-to-end export tests
//!
//! Builds stores in memory, runs the export and reads the workbook back with
//! calamine to check what a spreadsheet user would actually see.

use attendance_export::core::{AttendanceAggregator, DayIndex, MatrixBuilder};
use attendance_export::error::AttendanceError;
use attendance_export::excel::{SpreadsheetRenderer, SHEET_NAME};
use attendance_export::export::{build_matrix, export_attendance, ExportRequest};
use attendance_export::store::{Dataset, InMemoryStore};
use attendance_export::types::{
    AttendanceEvent, AttendanceStatus, ClassRecord, DayCell, ExportScope, Section, Student,
};
use calamine::{open_workbook_from_rs, Data, Dimensions, Range, Reader, Xlsx};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::io::{Cursor, Read};
use std::path::Path;

// ═══════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════

fn student(id: &str, name: &str) -> Student {
    Student::new(id, format!("2024{}", id), name, format!("{}@uni.edu", id))
}

fn section(id: &str, class_id: &str, number: u32, members: &[&str]) -> Section {
    Section {
        id: id.to_string(),
        class_id: class_id.to_string(),
        section_number: number,
        students: members.iter().map(|m| m.to_string()).collect(),
    }
}

fn event(
    student: &str,
    section: &str,
    day: u32,
    status: AttendanceStatus,
    minute: u32,
) -> AttendanceEvent {
    AttendanceEvent {
        student_id: student.to_string(),
        section_id: section.to_string(),
        class_id: "c1".to_string(),
        day_number: day,
        status,
        recorded_at: Utc.with_ymd_and_hms(2024, 9, day.min(28), 9, minute, 0).unwrap(),
    }
}

fn store(
    students: Vec<Student>,
    sections: Vec<Section>,
    events: Vec<AttendanceEvent>,
) -> InMemoryStore {
    InMemoryStore::new(Dataset {
        classes: vec![ClassRecord {
            id: "c1".to_string(),
            name: "Databases".to_string(),
            students,
        }],
        sections,
        events,
    })
}

fn read_sheet(bytes: &[u8]) -> Range<Data> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes.to_vec())).unwrap();
    workbook.worksheet_range(SHEET_NAME).unwrap()
}

/// Raw XML part of the xlsx container, e.g. `xl/styles.xml`
fn xml_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}

fn text(range: &Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => s.clone(),
        other => panic!("expected text at ({}, {}), found {:?}", row, col, other),
    }
}

fn number(range: &Range<Data>, row: u32, col: u32) -> f64 {
    match range.get_value((row, col)) {
        Some(Data::Float(f)) => *f,
        Some(Data::Int(i)) => *i as f64,
        other => panic!("expected number at ({}, {}), found {:?}", row, col, other),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SCENARIOS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_two_students_one_section_totals() {
    let store = store(
        vec![student("y", "Yusuf"), student("x", "Ximena")],
        vec![section("s1", "c1", 1, &["x", "y"])],
        vec![
            event("x", "s1", 1, AttendanceStatus::Present, 0),
            event("x", "s1", 2, AttendanceStatus::Present, 0),
            event("y", "s1", 1, AttendanceStatus::Present, 1),
        ],
    );

    let workbook = export_attendance(&store, &ExportRequest::new("c1", None))
        .await
        .unwrap();
    assert_eq!(workbook.students, 2);
    assert_eq!(workbook.days, 2);

    let sheet = read_sheet(&workbook.bytes);
    // Columns: A-D identity, E-F days, G total, H percentage
    assert_eq!(text(&sheet, 2, 1), "Ximena");
    assert_eq!(number(&sheet, 2, 6), 2.0);
    assert!((number(&sheet, 2, 7) - 1.0).abs() < 1e-9);

    assert_eq!(text(&sheet, 3, 1), "Yusuf");
    assert_eq!(number(&sheet, 3, 6), 1.0);
    assert!((number(&sheet, 3, 7) - 0.5).abs() < 1e-9);
    assert_eq!(text(&sheet, 3, 4), "✅");
    assert_eq!(text(&sheet, 3, 5), "❌");
}

#[tokio::test]
async fn test_student_without_sections() {
    let store = store(
        vec![student("a", "Amal"), student("n", "Nadia")],
        vec![section("s1", "c1", 1, &["a"])],
        vec![
            event("a", "s1", 1, AttendanceStatus::Present, 0),
            event("a", "s1", 2, AttendanceStatus::Late, 0),
        ],
    );

    let workbook = export_attendance(&store, &ExportRequest::new("c1", None))
        .await
        .unwrap();
    let sheet = read_sheet(&workbook.bytes);

    // Unenrolled student sorts last
    assert_eq!(text(&sheet, 3, 1), "Nadia");
    assert_eq!(text(&sheet, 3, 3), "N/A");
    assert_eq!(text(&sheet, 3, 4), "-");
    assert_eq!(text(&sheet, 3, 5), "-");
    assert_eq!(number(&sheet, 3, 7), 0.0);

    // Late renders with its own glyph
    assert_eq!(text(&sheet, 2, 5), "🕒");
}

#[tokio::test]
async fn test_unmatched_section_filter_is_not_found() {
    let store = store(
        vec![student("a", "Amal")],
        vec![
            section("s1", "c1", 1, &["a"]),
            section("other", "c2", 1, &["a"]),
        ],
        vec![],
    );

    let err = export_attendance(&store, &ExportRequest::new("c1", Some("other")))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AttendanceError::NotFound(ref m) if m == "No sections found for this class"
    ));
}

#[tokio::test]
async fn test_class_without_sections_is_not_found() {
    let store = store(vec![student("a", "Amal")], vec![], vec![]);
    let err = export_attendance(&store, &ExportRequest::new("c1", None))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_duplicate_events_resolve_to_one_status() {
    let store = store(
        vec![student("a", "Amal")],
        vec![section("s1", "c1", 1, &["a"])],
        vec![
            event("a", "s1", 1, AttendanceStatus::Late, 40),
            event("a", "s1", 1, AttendanceStatus::Present, 10),
        ],
    );

    let matrix = build_matrix(&store, "c1", None).await.unwrap();
    // Earliest recorded (present at :10) wins
    assert_eq!(matrix.rows[0].cells, vec![DayCell::Present]);
    assert_eq!(matrix.rows[0].total, 1);
    assert!((matrix.rows[0].percentage - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_no_events_defaults_to_single_day() {
    let store = store(
        vec![student("a", "Amal"), student("b", "Basel")],
        vec![section("s1", "c1", 1, &["a"])],
        vec![],
    );

    let matrix = build_matrix(&store, "c1", None).await.unwrap();
    assert_eq!(matrix.days.days(), &[1]);
    assert!(matrix.days.is_defaulted());
    assert_eq!(matrix.rows[0].cells, vec![DayCell::Absent]);
    assert_eq!(matrix.rows[1].cells, vec![DayCell::NotEnrolled]);

    let workbook = export_attendance(&store, &ExportRequest::new("c1", None))
        .await
        .unwrap();
    let sheet = read_sheet(&workbook.bytes);
    assert_eq!(text(&sheet, 1, 4), "Day 1");
}

// ═══════════════════════════════════════════════════════════════════════════
// SHAPE AND DETERMINISM
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_matrix_shape_without_attendance() {
    let students: Vec<Student> = (0..6)
        .map(|i| student(&format!("u{}", i), &format!("Student {}", i)))
        .collect();
    let sections = vec![
        section("s1", "c1", 1, &["u0", "u1"]),
        section("s2", "c1", 2, &["u2", "u3"]),
    ];
    // Only absences recorded: days exist, nobody attended
    let events = vec![
        event("u0", "s1", 1, AttendanceStatus::Absent, 0),
        event("u2", "s2", 3, AttendanceStatus::Absent, 0),
        event("u3", "s2", 5, AttendanceStatus::Absent, 0),
    ];
    let store = store(students, sections, events);

    let matrix = build_matrix(&store, "c1", None).await.unwrap();
    assert_eq!(matrix.rows.len(), 6);
    for row in &matrix.rows {
        assert_eq!(row.cells.len(), 3);
        assert_eq!(row.percentage, 0.0);
        let expected = if row.section_numbers.is_empty() {
            DayCell::NotEnrolled
        } else {
            DayCell::Absent
        };
        assert!(row.cells.iter().all(|cell| *cell == expected));
    }
}

#[tokio::test]
async fn test_export_is_repeatable() {
    let make = || {
        store(
            vec![
                student("c", "Carla"),
                student("a", "amir"),
                student("b", "Bilal"),
            ],
            vec![
                section("s2", "c1", 2, &["a"]),
                section("s1", "c1", 1, &["b", "c"]),
            ],
            vec![
                event("a", "s2", 1, AttendanceStatus::Present, 0),
                event("b", "s1", 2, AttendanceStatus::Late, 0),
            ],
        )
    };

    let first = build_matrix(&make(), "c1", None).await.unwrap();
    let second = build_matrix(&make(), "c1", None).await.unwrap();
    assert_eq!(first.rows, second.rows);

    let names: Vec<&str> = first.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Bilal", "Carla", "amir"]);
}

#[tokio::test]
async fn test_section_filter_scopes_days_and_sections() {
    let store = store(
        vec![student("a", "Amal"), student("b", "Basel")],
        vec![
            section("s1", "c1", 1, &["a"]),
            section("s2", "c1", 2, &["b"]),
        ],
        vec![
            event("a", "s1", 1, AttendanceStatus::Present, 0),
            event("b", "s2", 4, AttendanceStatus::Present, 0),
        ],
    );

    let workbook = export_attendance(&store, &ExportRequest::new("c1", Some("s2")))
        .await
        .unwrap();
    assert_eq!(workbook.filename, "attendance-icons-c1-section-s2.xlsx");
    assert_eq!(workbook.sections, 1);
    assert_eq!(workbook.days, 1);

    let matrix = build_matrix(&store, "c1", Some("s2")).await.unwrap();
    assert_eq!(matrix.days.days(), &[4]);
    // Amal is on the roster but outside the filtered section
    let amal = matrix.rows.iter().find(|r| r.name == "Amal").unwrap();
    assert_eq!(amal.cells, vec![DayCell::NotEnrolled]);
}

// ═══════════════════════════════════════════════════════════════════════════
// SHEET STRUCTURE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_sheet_headers_and_bands() {
    let sections = vec![section("s1", "c1", 1, &["a"])];
    let events = vec![
        event("a", "s1", 2, AttendanceStatus::Present, 0),
        event("a", "s1", 7, AttendanceStatus::Late, 0),
    ];
    let scope = ExportScope::new("c1", &sections);
    let days = DayIndex::build(&scope, &events);
    let summaries = AttendanceAggregator::new(&scope).aggregate(&events);
    let rows = MatrixBuilder::new(&sections, &days, &summaries)
        .build(&[student("a", "Amal")]);

    let bytes = SpreadsheetRenderer::new(&days)
        .unwrap()
        .render(&rows)
        .unwrap();
    let sheet = read_sheet(&bytes);

    assert_eq!(text(&sheet, 0, 0), "Student Data");
    assert_eq!(text(&sheet, 0, 4), "Class Attendance");

    let headers: Vec<String> = (0..8).map(|col| text(&sheet, 1, col)).collect();
    assert_eq!(
        headers,
        vec![
            "Student ID",
            "Name",
            "Email",
            "Section",
            "Day 2",
            "Day 7",
            "Total P+L",
            "Attendance %"
        ]
    );

    assert_eq!(text(&sheet, 2, 0), "2024a");
    assert_eq!(text(&sheet, 2, 2), "a@uni.edu");
    assert_eq!(text(&sheet, 2, 3), "1");
    assert_eq!(number(&sheet, 2, 6), 2.0);
    assert_eq!(sheet.height(), 3);
}

#[test]
fn test_sheet_styling() {
    // Present, absent and late cells plus one unenrolled student
    let sections = vec![section("s1", "c1", 1, &["a", "b"])];
    let events = vec![
        event("a", "s1", 1, AttendanceStatus::Present, 0),
        event("a", "s1", 2, AttendanceStatus::Late, 0),
        event("b", "s1", 2, AttendanceStatus::Absent, 0),
    ];
    let roster = [
        student("a", "Amal"),
        student("b", "Basel"),
        student("n", "Nadia"),
    ];
    let scope = ExportScope::new("c1", &sections);
    let days = DayIndex::build(&scope, &events);
    let summaries = AttendanceAggregator::new(&scope).aggregate(&events);
    let rows = MatrixBuilder::new(&sections, &days, &summaries)
        .build(&roster);
    let bytes = SpreadsheetRenderer::new(&days)
        .unwrap()
        .render(&rows)
        .unwrap();

    // Bands: A1:D1 and E1:H1 (2 days, total, percentage)
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes.clone())).unwrap();
    let merges = workbook.worksheet_merge_cells(SHEET_NAME).unwrap().unwrap();
    assert_eq!(merges.len(), 2);
    assert!(merges.contains(&Dimensions {
        start: (0, 0),
        end: (0, 3)
    }));
    assert!(merges.contains(&Dimensions {
        start: (0, 4),
        end: (0, 7)
    }));

    let sheet_xml = xml_part(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet_xml.contains(r#"<pane xSplit="4" ySplit="2" topLeftCell="E3""#));
    assert!(sheet_xml.contains(r#"state="frozen""#));

    let styles_xml = xml_part(&bytes, "xl/styles.xml");
    assert!(styles_xml.contains(r#"formatCode="0.00%""#));
    assert!(styles_xml.contains(r#"style="thin""#));
    // Fill and font per status, grey font for not enrolled, grey header fill
    for rgb in [
        "FFC6EFCE", "FF006100", "FFFFC7CE", "FF9C0006", "FFFFEB9C", "FF9C6500", "FF808080",
        "FFD3D3D3",
    ] {
        assert!(styles_xml.contains(rgb), "missing colour {}", rgb);
    }
}

#[tokio::test]
async fn test_fixture_dataset_export() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data/attendance.yaml");
    let store = InMemoryStore::load(&path).unwrap();

    let matrix = build_matrix(&store, "cs101", None).await.unwrap();
    let names: Vec<&str> = matrix.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Layla Hassan", "Omar Said", "Mona Adel", "Karim Fathy"]
    );

    let omar = &matrix.rows[1];
    assert_eq!(omar.section_display(), "1, 2");
    assert_eq!(
        omar.cells,
        vec![DayCell::Late, DayCell::Present, DayCell::Absent]
    );
    assert_eq!(omar.total, 2);

    let workbook = export_attendance(&store, &ExportRequest::new("cs101", None))
        .await
        .unwrap();
    assert_eq!(workbook.filename, "attendance-icons-cs101-allSections.xlsx");
    assert_eq!(
        workbook.content_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
}
