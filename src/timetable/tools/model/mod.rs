//! Reference records, the annotation representation and the output row.
//!
//! The spreadsheet model shared by readers, writers and the pipeline lives in
//! [`workbook`].

pub mod workbook;

use serde::{Deserialize, Serialize};

pub use workbook::{
    BorderLine, Borders, Cell, CellStyle, CellValue, ColIndex, FontStyle, HorizontalAlign, Row,
    RowIndex, Sheet, VerticalAlign, Workbook,
};

/// Token list extracted from one parenthetical group of a course name.
///
/// The first and last tokens are always the literal markers `"("` and `")"`
/// so the content tokens start at index 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub tokens: Vec<String>,
}

impl Annotation {
    pub const OPEN: &'static str = "(";
    pub const CLOSE: &'static str = ")";

    /// Wraps content tokens between the boundary markers.
    pub fn from_content<I, S>(content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = vec![Self::OPEN.to_string()];
        tokens.extend(content.into_iter().map(Into::into));
        tokens.push(Self::CLOSE.to_string());
        Self { tokens }
    }

    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }
}

/// A course as stored in the reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    #[serde(alias = "courNum")]
    pub id: String,
    #[serde(alias = "courName")]
    pub name: String,
    #[serde(default, alias = "ttime")]
    pub start_time: Option<String>,
    #[serde(default, alias = "utime")]
    pub end_time: Option<String>,
    /// Filled in once by the index builder from `name`.
    #[serde(skip)]
    pub annotations: Vec<Annotation>,
}

impl CourseRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_time: None,
            end_time: None,
            annotations: Vec::new(),
        }
    }

    pub fn with_schedule(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_time = Some(start.into());
        self.end_time = Some(end.into());
        self
    }
}

/// A class (a group of pupils of one grade).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    #[serde(alias = "classNum")]
    pub id: String,
    #[serde(alias = "className")]
    pub name: String,
    #[serde(default)]
    pub grade: Option<String>,
}

impl ClassRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grade: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherRecord {
    #[serde(alias = "trNum")]
    pub id: String,
    #[serde(alias = "trFirstName")]
    pub surname: String,
    #[serde(alias = "trName")]
    pub given_name: String,
}

impl TeacherRecord {
    pub fn new(
        id: impl Into<String>,
        surname: impl Into<String>,
        given_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            surname: surname.into(),
            given_name: given_name.into(),
        }
    }

    /// Surname followed by given name, the form used in schedule sheets.
    pub fn full_name(&self) -> String {
        format!("{}{}", self.surname, self.given_name)
    }
}

/// One line of the generated assignment sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentRow {
    pub teacher_id: String,
    pub teacher_name: String,
    pub course_id: String,
    /// The course name exactly as written in the uploaded schedule.
    pub course_name: String,
    pub class_id: String,
    pub class_name: String,
    pub max_capacity: u32,
    pub min_capacity: u32,
    pub start_time: String,
    pub end_time: String,
    pub remark: String,
}

impl AssignmentRow {
    /// Number of columns an assignment row occupies.
    pub const WIDTH: usize = 11;

    /// Lays the row out as cells in the fixed column order.
    pub fn to_row(&self) -> Row {
        let values = [
            CellValue::text(&self.teacher_id),
            CellValue::text(&self.teacher_name),
            CellValue::text(&self.course_id),
            CellValue::text(&self.course_name),
            CellValue::text(&self.class_id),
            CellValue::text(&self.class_name),
            CellValue::Number(f64::from(self.max_capacity)),
            CellValue::Number(f64::from(self.min_capacity)),
            CellValue::text(&self.start_time),
            CellValue::text(&self.end_time),
            CellValue::text(&self.remark),
        ];

        let mut row = Row::default();
        for (col, value) in values.into_iter().enumerate() {
            row.set(col as ColIndex, Cell::new(value));
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_content_sits_between_markers() {
        let annotation = Annotation::from_content(["二上", "选修"]);
        assert_eq!(annotation.token(0), Some("("));
        assert_eq!(annotation.token(1), Some("二上"));
        assert_eq!(annotation.token(2), Some("选修"));
        assert_eq!(annotation.token(3), Some(")"));
        assert_eq!(annotation.token(4), None);
    }

    #[test]
    fn records_accept_store_column_names() {
        let course: CourseRecord = serde_json::from_value(serde_json::json!({
            "courNum": "C01",
            "courName": "体育二（二上）",
            "ttime": "2024-09-01"
        }))
        .expect("course parsed");
        assert_eq!(course.id, "C01");
        assert_eq!(course.start_time.as_deref(), Some("2024-09-01"));
        assert_eq!(course.end_time, None);
        assert!(course.annotations.is_empty());

        let teacher: TeacherRecord = serde_json::from_value(serde_json::json!({
            "trNum": "T9", "trFirstName": "王", "trName": "芳"
        }))
        .expect("teacher parsed");
        assert_eq!(teacher.full_name(), "王芳");
    }

    #[test]
    fn assignment_row_has_fixed_layout() {
        let row = AssignmentRow {
            teacher_id: "T1".into(),
            teacher_name: "李雷".into(),
            course_id: "C1".into(),
            course_name: "体育二".into(),
            class_id: "K1".into(),
            class_name: "三1班".into(),
            max_capacity: 60,
            min_capacity: 30,
            start_time: String::new(),
            end_time: String::new(),
            remark: String::new(),
        }
        .to_row();

        assert_eq!(row.cell_end() as usize, AssignmentRow::WIDTH);
        assert_eq!(row.cell(6).map(|c| &c.value), Some(&CellValue::Number(60.0)));
        assert_eq!(row.cell(10).map(|c| &c.value), Some(&CellValue::text("")));
    }
}
