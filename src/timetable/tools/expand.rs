//! Turns the data rows of a schedule sheet into assignment rows.

use tracing::{debug, instrument};

use crate::config::PipelineConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::display::display_text;
use crate::header::{FIRST_DATA_COLUMN, GradeMap};
use crate::index::ReferenceIndex;
use crate::matcher::{CellRef, match_class, match_course};
use crate::model::{AssignmentRow, ClassRecord, CourseRecord, Row, RowIndex, Sheet};
use crate::symbol::strip_annotations;

/// Everything the expander reads while walking one sheet.
#[derive(Debug, Clone, Copy)]
pub struct SheetContext<'a> {
    pub sheet_name: &'a str,
    pub header: &'a Row,
    pub grades: &'a GradeMap,
    pub index: &'a ReferenceIndex,
    pub config: &'a PipelineConfig,
}

/// Walks every data row (all rows after the header) and every class column,
/// collecting one [`AssignmentRow`] per teacher bound to a fully matched cell.
///
/// Order follows row, then column, then the teacher order of the index. No
/// sorting or deduplication is applied.
#[instrument(level = "debug", skip_all, fields(sheet = %context.sheet_name))]
pub fn expand_sheet(
    input: &Sheet,
    context: &SheetContext<'_>,
    diagnostics: &mut Diagnostics,
) -> Vec<AssignmentRow> {
    let mut assignments = Vec::new();
    let Some(last_row) = input.last_row_index() else {
        return assignments;
    };
    debug!(last_row, "expanding data rows");

    for row_index in 1..=last_row {
        let Some(row) = input.row(row_index) else {
            debug!(row = row_index + 1, "skipping absent row");
            continue;
        };
        expand_row(row, row_index, context, diagnostics, &mut assignments);
    }

    assignments
}

fn expand_row(
    row: &Row,
    row_index: RowIndex,
    context: &SheetContext<'_>,
    diagnostics: &mut Diagnostics,
    assignments: &mut Vec<AssignmentRow>,
) {
    let course_name = display_text(row.cell(0));
    if course_name.is_empty() {
        debug!(row = row_index + 1, "skipping row without course name");
        return;
    }

    let base_name = strip_annotations(&course_name);
    let Some(variants) = context.index.courses.variants(&base_name) else {
        diagnostics.warn(
            context.sheet_name,
            DiagnosticKind::UnknownCourse {
                row: row_index,
                course: course_name,
            },
        );
        return;
    };

    for column in FIRST_DATA_COLUMN..row.cell_end() {
        let teacher_name = display_text(row.cell(column));
        if teacher_name.is_empty() {
            debug!(row = row_index + 1, column = column + 1, "skipping empty teacher cell");
            continue;
        }

        let Some(teachers) = context.index.teachers.get(&teacher_name) else {
            diagnostics.warn(
                context.sheet_name,
                DiagnosticKind::UnknownTeacher {
                    row: row_index,
                    column,
                    teacher: teacher_name,
                },
            );
            continue;
        };

        let Some(&grade) = context.grades.get(&column) else {
            diagnostics.warn(
                context.sheet_name,
                DiagnosticKind::MissingGrade {
                    row: row_index,
                    column,
                },
            );
            continue;
        };

        let at = CellRef {
            sheet: context.sheet_name,
            row: row_index,
            column,
        };
        let Some(course) = match_course(
            variants,
            grade,
            &context.config.term_marker,
            &course_name,
            at,
            diagnostics,
        ) else {
            continue;
        };

        let Some(class) = match_class(
            context.header,
            column,
            &context.index.classes,
            context.sheet_name,
            diagnostics,
        ) else {
            continue;
        };

        for teacher in teachers {
            assignments.push(AssignmentRow {
                teacher_id: teacher.id.clone(),
                teacher_name: teacher.full_name(),
                ..assignment_template(course, &course_name, class, context.config)
            });
        }
    }
}

fn assignment_template(
    course: &CourseRecord,
    course_name: &str,
    class: &ClassRecord,
    config: &PipelineConfig,
) -> AssignmentRow {
    AssignmentRow {
        teacher_id: String::new(),
        teacher_name: String::new(),
        course_id: course.id.clone(),
        course_name: course_name.to_string(),
        class_id: class.id.clone(),
        class_name: class.name.clone(),
        max_capacity: config.max_capacity,
        min_capacity: config.min_capacity,
        start_time: course.start_time.clone().unwrap_or_default(),
        end_time: course.end_time.clone().unwrap_or_default(),
        remark: String::new(),
    }
}

/// Appends assignment rows below the last present row of `output`.
pub fn write_assignments(output: &mut Sheet, assignments: &[AssignmentRow]) {
    for assignment in assignments {
        let index = output.append_row(assignment.to_row());
        debug!(sheet = %output.name, row = index + 1, "assignment row written");
    }
}
