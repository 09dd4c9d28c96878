//! Recoverable problems found during an assignment run.
//!
//! Nothing in here aborts processing: the affected sheet, row or column is
//! left out of the output and the event is kept for the caller. Every recorded
//! diagnostic is also emitted as a `tracing` warning.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::model::{ColIndex, RowIndex};

/// What could not be matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The uploaded sheet has no counterpart in the template.
    MissingTemplateSheet,
    /// The uploaded sheet has no header row.
    MissingHeader,
    /// No course shares the stripped name of the row label.
    UnknownCourse { row: RowIndex, course: String },
    /// No teacher is known under the name in the cell.
    UnknownTeacher {
        row: RowIndex,
        column: ColIndex,
        teacher: String,
    },
    /// The header gives no grade for the column.
    MissingGrade { row: RowIndex, column: ColIndex },
    /// Courses exist under the base name but none is tagged for the grade and
    /// term.
    UnmatchedCourseVariant {
        row: RowIndex,
        column: ColIndex,
        course: String,
        grade: char,
    },
    /// The header cell above the column is empty.
    MissingClassName { column: ColIndex },
    /// No class is known under the header label.
    UnknownClass { column: ColIndex, class: String },
}

/// A recorded problem, scoped to the sheet it occurred in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub sheet: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    // Rows and columns are shown 1-based, as a spreadsheet user counts them.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sheet = &self.sheet;
        match &self.kind {
            DiagnosticKind::MissingTemplateSheet => {
                write!(f, "sheet '{sheet}' not found in template, skipped")
            }
            DiagnosticKind::MissingHeader => write!(f, "sheet '{sheet}' has no header, skipped"),
            DiagnosticKind::UnknownCourse { row, course } => write!(
                f,
                "course '{course}' not found (sheet '{sheet}', row {})",
                row + 1
            ),
            DiagnosticKind::UnknownTeacher {
                row,
                column,
                teacher,
            } => write!(
                f,
                "teacher '{teacher}' not found (sheet '{sheet}', row {}, column {})",
                row + 1,
                column + 1
            ),
            DiagnosticKind::MissingGrade { row, column } => write!(
                f,
                "no grade for column {} (sheet '{sheet}', row {})",
                column + 1,
                row + 1
            ),
            DiagnosticKind::UnmatchedCourseVariant {
                course, grade, row, ..
            } => write!(
                f,
                "no variant of course '{course}' for grade '{grade}' (sheet '{sheet}', row {})",
                row + 1
            ),
            DiagnosticKind::MissingClassName { column } => write!(
                f,
                "no class name in header column {} (sheet '{sheet}')",
                column + 1
            ),
            DiagnosticKind::UnknownClass { column, class } => write!(
                f,
                "class '{class}' not found (sheet '{sheet}', column {})",
                column + 1
            ),
        }
    }
}

/// Ordered log of the diagnostics of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a problem and emits it as a warning.
    pub fn warn(&mut self, sheet: &str, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            sheet: sheet.to_string(),
            kind,
        };
        warn!(sheet, "{diagnostic}");
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn for_sheet<'a>(&'a self, sheet: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.entries.iter().filter(move |entry| entry.sheet == sheet)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_use_one_based_positions() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn(
            "一年级",
            DiagnosticKind::UnknownTeacher {
                row: 2,
                column: 1,
                teacher: "张三".into(),
            },
        );

        let message = diagnostics.entries()[0].to_string();
        assert_eq!(
            message,
            "teacher '张三' not found (sheet '一年级', row 3, column 2)"
        );
    }

    #[test]
    fn filters_by_sheet() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn("a", DiagnosticKind::MissingHeader);
        diagnostics.warn("b", DiagnosticKind::MissingTemplateSheet);
        diagnostics.warn("a", DiagnosticKind::MissingClassName { column: 3 });

        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics.for_sheet("a").count(), 2);
    }
}
