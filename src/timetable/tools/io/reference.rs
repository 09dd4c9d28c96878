//! Reference data: the full course, class and teacher tables.
//!
//! The pipeline never queries or filters; it loads every record through a
//! [`ReferenceSource`] and builds its indices from them.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::display::display_text;
use crate::error::{Result, ToolError};
use crate::index::ReferenceIndex;
use crate::io::excel_read;
use crate::model::{ClassRecord, ColIndex, CourseRecord, Row, Sheet, TeacherRecord, Workbook};

/// Sheet names expected in an XLSX reference workbook.
pub const COURSES_SHEET: &str = "courses";
pub const CLASSES_SHEET: &str = "classes";
pub const TEACHERS_SHEET: &str = "teachers";

/// The three flat reads the pipeline needs from its backing store.
pub trait ReferenceSource {
    fn courses(&self) -> Result<Vec<CourseRecord>>;
    fn classes(&self) -> Result<Vec<ClassRecord>>;
    fn teachers(&self) -> Result<Vec<TeacherRecord>>;

    /// Loads all three tables and indexes them.
    fn load_index(&self) -> Result<ReferenceIndex> {
        Ok(ReferenceIndex::build(
            self.courses()?,
            self.classes()?,
            self.teachers()?,
        ))
    }
}

/// In-memory tables, typically already fetched by the caller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReferenceTables {
    pub courses: Vec<CourseRecord>,
    pub classes: Vec<ClassRecord>,
    pub teachers: Vec<TeacherRecord>,
}

impl ReferenceSource for ReferenceTables {
    fn courses(&self) -> Result<Vec<CourseRecord>> {
        Ok(self.courses.clone())
    }

    fn classes(&self) -> Result<Vec<ClassRecord>> {
        Ok(self.classes.clone())
    }

    fn teachers(&self) -> Result<Vec<TeacherRecord>> {
        Ok(self.teachers.clone())
    }
}

/// A JSON document with `courses`, `classes` and `teachers` arrays.
///
/// The file is read again on every call so each request sees current data.
#[derive(Debug, Clone)]
pub struct JsonReferenceSource {
    path: PathBuf,
}

impl JsonReferenceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tables(&self) -> Result<ReferenceTables> {
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl ReferenceSource for JsonReferenceSource {
    fn courses(&self) -> Result<Vec<CourseRecord>> {
        Ok(self.tables()?.courses)
    }

    fn classes(&self) -> Result<Vec<ClassRecord>> {
        Ok(self.tables()?.classes)
    }

    fn teachers(&self) -> Result<Vec<TeacherRecord>> {
        Ok(self.tables()?.teachers)
    }

    fn load_index(&self) -> Result<ReferenceIndex> {
        let tables = self.tables()?;
        Ok(ReferenceIndex::build(
            tables.courses,
            tables.classes,
            tables.teachers,
        ))
    }
}

/// An XLSX workbook with `courses`, `classes` and `teachers` sheets whose
/// first row names the columns.
#[derive(Debug, Clone)]
pub struct WorkbookReferenceSource {
    path: PathBuf,
}

impl WorkbookReferenceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn workbook(&self) -> Result<Workbook> {
        excel_read::read_workbook(&self.path)
    }
}

impl ReferenceSource for WorkbookReferenceSource {
    fn courses(&self) -> Result<Vec<CourseRecord>> {
        courses_from_workbook(&self.workbook()?)
    }

    fn classes(&self) -> Result<Vec<ClassRecord>> {
        classes_from_workbook(&self.workbook()?)
    }

    fn teachers(&self) -> Result<Vec<TeacherRecord>> {
        teachers_from_workbook(&self.workbook()?)
    }

    fn load_index(&self) -> Result<ReferenceIndex> {
        let workbook = self.workbook()?;
        Ok(ReferenceIndex::build(
            courses_from_workbook(&workbook)?,
            classes_from_workbook(&workbook)?,
            teachers_from_workbook(&workbook)?,
        ))
    }
}

/// Picks the source implementation from the file extension.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn open_reference(path: &Path) -> Result<Box<dyn ReferenceSource>> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => Ok(Box::new(JsonReferenceSource::new(path))),
        Some("xlsx") | Some("xlsm") => Ok(Box::new(WorkbookReferenceSource::new(path))),
        _ => Err(ToolError::InvalidArgument(format!(
            "unsupported reference data format: {}",
            path.display()
        ))),
    }
}

pub fn courses_from_workbook(workbook: &Workbook) -> Result<Vec<CourseRecord>> {
    let table = Table::open(workbook, COURSES_SHEET)?;
    let id = table.required(&["id", "courNum", "课程编号"])?;
    let name = table.required(&["name", "courName", "课程名称"])?;
    let start = table.optional(&["start_time", "ttime", "开始日期"]);
    let end = table.optional(&["end_time", "utime", "结束日期"]);

    Ok(table
        .records(id, |row| CourseRecord {
            id: text(row, Some(id)),
            name: text(row, Some(name)),
            start_time: optional_text(row, start),
            end_time: optional_text(row, end),
            annotations: Vec::new(),
        }))
}

pub fn classes_from_workbook(workbook: &Workbook) -> Result<Vec<ClassRecord>> {
    let table = Table::open(workbook, CLASSES_SHEET)?;
    let id = table.required(&["id", "classNum", "班级编号"])?;
    let name = table.required(&["name", "className", "班级名称"])?;
    let grade = table.optional(&["grade", "年级"]);

    Ok(table.records(id, |row| ClassRecord {
        id: text(row, Some(id)),
        name: text(row, Some(name)),
        grade: optional_text(row, grade),
    }))
}

pub fn teachers_from_workbook(workbook: &Workbook) -> Result<Vec<TeacherRecord>> {
    let table = Table::open(workbook, TEACHERS_SHEET)?;
    let id = table.required(&["id", "trNum", "教师编号"])?;
    let surname = table.required(&["surname", "trFirstName", "姓"])?;
    let given_name = table.required(&["given_name", "trName", "名"])?;

    Ok(table.records(id, |row| TeacherRecord {
        id: text(row, Some(id)),
        surname: text(row, Some(surname)),
        given_name: text(row, Some(given_name)),
    }))
}

/// A reference sheet with its header resolved to column positions.
struct Table<'a> {
    sheet: &'a Sheet,
    columns: HashMap<String, ColIndex>,
}

impl<'a> Table<'a> {
    fn open(workbook: &'a Workbook, name: &str) -> Result<Self> {
        let sheet = workbook
            .sheet(name)
            .ok_or_else(|| ToolError::InvalidReference(format!("missing sheet '{name}'")))?;
        let columns: HashMap<String, ColIndex> = sheet
            .row(0)
            .map(|header| {
                header
                    .cells
                    .keys()
                    .map(|col| (display_text(header.cell(*col)), *col))
                    .filter(|(label, _)| !label.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self { sheet, columns })
    }

    fn optional(&self, names: &[&str]) -> Option<ColIndex> {
        names
            .iter()
            .find_map(|name| self.columns.get(*name).copied())
    }

    fn required(&self, names: &[&str]) -> Result<ColIndex> {
        self.optional(names).ok_or_else(|| {
            ToolError::InvalidReference(format!(
                "sheet '{}' has no '{}' column",
                self.sheet.name, names[0]
            ))
        })
    }

    /// Maps every data row with a non-empty identifier.
    fn records<T>(&self, id: ColIndex, build: impl Fn(&Row) -> T) -> Vec<T> {
        let records: Vec<T> = self
            .sheet
            .rows
            .range(1..)
            .filter(|(_, row)| !display_text(row.cell(id)).is_empty())
            .map(|(_, row)| build(row))
            .collect();
        debug!(sheet = %self.sheet.name, records = records.len(), "reference sheet read");
        records
    }
}

fn text(row: &Row, col: Option<ColIndex>) -> String {
    col.map(|col| display_text(row.cell(col)))
        .unwrap_or_default()
}

fn optional_text(row: &Row, col: Option<ColIndex>) -> Option<String> {
    Some(text(row, col)).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, CellValue};

    fn sheet(name: &str, rows: &[&[&str]]) -> Sheet {
        let mut sheet = Sheet::new(name);
        for (index, texts) in rows.iter().enumerate() {
            sheet.insert_row(index as u32, Row::from_texts(texts.iter().copied()));
        }
        sheet
    }

    fn reference_workbook() -> Workbook {
        let mut courses = sheet(
            COURSES_SHEET,
            &[
                &["课程编号", "课程名称", "开始日期"],
                &["C1", "音乐（三上）", "2024-09-01"],
                &["", "ignored"],
            ],
        );
        courses.set_cell(3, 0, Cell::new(CellValue::Number(2.0)));
        courses.set_cell(3, 1, Cell::new(CellValue::text("美术（四上）")));

        Workbook {
            sheets: vec![
                courses,
                sheet(CLASSES_SHEET, &[&["classNum", "className"], &["K31", "三1班"]]),
                sheet(
                    TEACHERS_SHEET,
                    &[&["id", "surname", "given_name"], &["T1", "王", "芳"]],
                ),
            ],
        }
    }

    #[test]
    fn reads_records_by_header_names() {
        let workbook = reference_workbook();

        let courses = courses_from_workbook(&workbook).expect("courses read");
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].start_time.as_deref(), Some("2024-09-01"));
        assert_eq!(courses[0].end_time, None);
        assert_eq!(courses[1].id, "2");

        let classes = classes_from_workbook(&workbook).expect("classes read");
        assert_eq!(classes, vec![ClassRecord::new("K31", "三1班")]);

        let teachers = teachers_from_workbook(&workbook).expect("teachers read");
        assert_eq!(teachers[0].full_name(), "王芳");
    }

    #[test]
    fn missing_sheet_or_column_is_invalid_reference() {
        let workbook = Workbook {
            sheets: vec![sheet(TEACHERS_SHEET, &[&["id", "surname"]])],
        };
        assert!(matches!(
            courses_from_workbook(&workbook),
            Err(ToolError::InvalidReference(_))
        ));
        assert!(matches!(
            teachers_from_workbook(&workbook),
            Err(ToolError::InvalidReference(_))
        ));
    }

    #[test]
    fn json_source_reads_store_column_names() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("reference.json");
        let document = serde_json::json!({
            "courses": [{"courNum": "C1", "courName": "音乐（三上）"}],
            "classes": [{"classNum": "K31", "className": "三1班", "grade": "三"}],
            "teachers": [{"trNum": "T1", "trFirstName": "王", "trName": "芳"}]
        });
        fs::write(&path, document.to_string()).expect("reference written");

        let source = open_reference(&path).expect("source opened");
        let index = source.load_index().expect("index built");
        assert!(index.courses.variants("音乐").is_some());
        assert!(index.classes.get("三1班").is_some());
        assert_eq!(index.teachers.get("王芳").map(<[_]>::len), Some(1));
    }

    #[test]
    fn in_memory_tables_are_a_source() {
        let tables = ReferenceTables {
            teachers: vec![TeacherRecord::new("T1", "王", "芳")],
            ..ReferenceTables::default()
        };
        let index = tables.load_index().expect("index built");
        assert!(index.courses.is_empty());
        assert_eq!(index.teachers.len(), 1);
    }
}
