//! Drives a whole uploaded workbook through the assignment pipeline.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::PipelineConfig;
use crate::copier::copy_sheet;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::expand::{SheetContext, expand_sheet, write_assignments};
use crate::header::resolve_grades;
use crate::index::ReferenceIndex;
use crate::model::{Sheet, Workbook};

/// Number of assignment rows produced for one output sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
    pub sheet: String,
    pub assignments: usize,
}

/// Result of a run: the generated workbook and everything worth reporting.
#[derive(Debug, Clone)]
pub struct AssignmentReport {
    pub workbook: Workbook,
    pub sheets: Vec<SheetSummary>,
    pub diagnostics: Diagnostics,
}

impl AssignmentReport {
    pub fn total_assignments(&self) -> usize {
        self.sheets.iter().map(|summary| summary.assignments).sum()
    }
}

/// Processes every sheet of `input` against its same-named `template` sheet.
///
/// Problems with one sheet never stop the others: a sheet missing from the
/// template is skipped, and a sheet without a header keeps only the copied
/// template structure.
#[instrument(level = "info", skip_all, fields(sheet_count = input.sheets.len()))]
pub fn assign_workbook(
    input: &Workbook,
    template: &Workbook,
    index: &ReferenceIndex,
    config: &PipelineConfig,
) -> AssignmentReport {
    info!("processing workbook");
    let mut output = Workbook::new();
    let mut sheets = Vec::new();
    let mut diagnostics = Diagnostics::new();

    for input_sheet in &input.sheets {
        let name = input_sheet.name.as_str();
        info!(sheet = name, "processing sheet");

        let Some(template_sheet) = template.sheet(name) else {
            diagnostics.warn(name, DiagnosticKind::MissingTemplateSheet);
            continue;
        };

        let output_sheet = output.push_sheet(Sheet::new(name));
        copy_sheet(template_sheet, output_sheet);

        let assignments = match input_sheet.row(0) {
            Some(header) => {
                let grades = resolve_grades(header);
                debug!(sheet = name, ?grades, "header resolved");
                let context = SheetContext {
                    sheet_name: name,
                    header,
                    grades: &grades,
                    index,
                    config,
                };
                let rows = expand_sheet(input_sheet, &context, &mut diagnostics);
                write_assignments(output_sheet, &rows);
                rows.len()
            }
            None => {
                diagnostics.warn(name, DiagnosticKind::MissingHeader);
                0
            }
        };

        info!(sheet = name, assignments, "sheet processed");
        sheets.push(SheetSummary {
            sheet: name.to_string(),
            assignments,
        });
    }

    info!(
        sheets = sheets.len(),
        diagnostics = diagnostics.len(),
        "workbook processed"
    );
    AssignmentReport {
        workbook: output,
        sheets,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Cell, CellStyle, CellValue, ClassRecord, CourseRecord, FontStyle, Row, TeacherRecord,
    };

    fn index() -> ReferenceIndex {
        ReferenceIndex::build(
            vec![CourseRecord::new("C3", "音乐（三上）")],
            vec![ClassRecord::new("K31", "三1班")],
            vec![TeacherRecord::new("T1", "王", "芳")],
        )
    }

    fn template_sheet(name: &str) -> Sheet {
        let mut sheet = Sheet::new(name);
        let bold = CellStyle {
            font: FontStyle {
                bold: true,
                ..FontStyle::default()
            },
            ..CellStyle::default()
        };
        for (col, label) in ["教师编号", "教师姓名"].into_iter().enumerate() {
            sheet.set_cell(0, col as u16, Cell::with_style(CellValue::text(label), bold.clone()));
        }
        sheet
    }

    fn schedule_sheet(name: &str) -> Sheet {
        let mut sheet = Sheet::new(name);
        sheet.insert_row(0, Row::from_texts(["课程", "三1班"]));
        sheet.insert_row(1, Row::from_texts(["音乐", "王芳"]));
        sheet
    }

    #[test]
    fn sheet_missing_from_template_is_skipped() {
        let input = Workbook {
            sheets: vec![schedule_sheet("未知"), schedule_sheet("三年级")],
        };
        let template = Workbook {
            sheets: vec![template_sheet("三年级")],
        };

        let report = assign_workbook(&input, &template, &index(), &PipelineConfig::default());

        assert_eq!(report.workbook.sheet_names().collect::<Vec<_>>(), vec!["三年级"]);
        assert_eq!(
            report.sheets,
            vec![SheetSummary {
                sheet: "三年级".into(),
                assignments: 1
            }]
        );
        assert_eq!(
            report.diagnostics.entries()[0].kind,
            DiagnosticKind::MissingTemplateSheet
        );
    }

    #[test]
    fn assignments_follow_copied_template_rows() {
        let input = Workbook {
            sheets: vec![schedule_sheet("三年级")],
        };
        let template = Workbook {
            sheets: vec![template_sheet("三年级")],
        };

        let report = assign_workbook(&input, &template, &index(), &PipelineConfig::default());
        let sheet = report.workbook.sheet("三年级").expect("output sheet");

        assert!(sheet.cell(0, 0).is_some_and(|c| c.style.font.bold));
        assert_eq!(
            sheet.cell(1, 0).map(|c| &c.value),
            Some(&CellValue::text("T1"))
        );
        assert_eq!(report.total_assignments(), 1);
    }

    #[test]
    fn sheet_without_header_keeps_template_only() {
        let mut headless = Sheet::new("三年级");
        headless.insert_row(3, Row::from_texts(["音乐", "王芳"]));
        let input = Workbook {
            sheets: vec![headless, schedule_sheet("四年级")],
        };
        let template = Workbook {
            sheets: vec![template_sheet("三年级"), template_sheet("四年级")],
        };

        let report = assign_workbook(&input, &template, &index(), &PipelineConfig::default());

        let headless_out = report.workbook.sheet("三年级").expect("output sheet");
        assert_eq!(headless_out.row_count(), 1);
        assert_eq!(
            report.diagnostics.entries()[0].kind,
            DiagnosticKind::MissingHeader
        );
        assert_eq!(report.sheets.len(), 2);
        assert_eq!(report.sheets[1].assignments, 1);
    }

    #[test]
    fn term_marker_comes_from_config() {
        let input = Workbook {
            sheets: vec![schedule_sheet("三年级")],
        };
        let template = Workbook {
            sheets: vec![template_sheet("三年级")],
        };
        let config = PipelineConfig {
            term_marker: "下".into(),
            ..PipelineConfig::default()
        };

        let report = assign_workbook(&input, &template, &index(), &config);
        assert_eq!(report.total_assignments(), 0);
        assert!(matches!(
            report.diagnostics.entries()[0].kind,
            DiagnosticKind::UnmatchedCourseVariant { grade: '三', .. }
        ));
    }
}
