use tracing::trace;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::display::display_text;
use crate::index::ClassIndex;
use crate::model::{ClassRecord, ColIndex, CourseRecord, Row, RowIndex};

/// Position of the schedule cell being matched, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef<'a> {
    pub sheet: &'a str,
    pub row: RowIndex,
    pub column: ColIndex,
}

/// Picks the first variant annotated for `grade` + `term_marker`.
///
/// A variant qualifies when any of its annotations has that tag as its first
/// content token, e.g. `（三上）` or `（三上 选修）` for grade `三` and marker
/// `上`. On a miss the problem is recorded and `None` is returned.
pub fn match_course<'a>(
    variants: &'a [CourseRecord],
    grade: char,
    term_marker: &str,
    course_name: &str,
    at: CellRef<'_>,
    diagnostics: &mut Diagnostics,
) -> Option<&'a CourseRecord> {
    let tag = format!("{grade}{term_marker}");
    let matched = variants.iter().find(|course| {
        course
            .annotations
            .iter()
            .any(|annotation| annotation.token(1) == Some(tag.as_str()))
    });

    match matched {
        Some(course) => {
            trace!(course_id = %course.id, %tag, "course variant matched");
            Some(course)
        }
        None => {
            diagnostics.warn(
                at.sheet,
                DiagnosticKind::UnmatchedCourseVariant {
                    row: at.row,
                    column: at.column,
                    course: course_name.to_string(),
                    grade,
                },
            );
            None
        }
    }
}

/// Resolves the class named by the header label above `column`.
pub fn match_class<'a>(
    header: &Row,
    column: ColIndex,
    classes: &'a ClassIndex,
    sheet: &str,
    diagnostics: &mut Diagnostics,
) -> Option<&'a ClassRecord> {
    let class_name = display_text(header.cell(column));
    if class_name.is_empty() {
        diagnostics.warn(sheet, DiagnosticKind::MissingClassName { column });
        return None;
    }

    let class = classes.get(&class_name);
    if class.is_none() {
        diagnostics.warn(
            sheet,
            DiagnosticKind::UnknownClass {
                column,
                class: class_name,
            },
        );
    }
    class
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::CourseIndex;

    const AT: CellRef<'static> = CellRef {
        sheet: "一年级",
        row: 1,
        column: 1,
    };

    fn physical_education() -> CourseIndex {
        CourseIndex::build([
            CourseRecord::new("PE-2", "体育二（体育二）（二上）"),
            CourseRecord::new("PE-3", "体育二（体育二）（三上）"),
            CourseRecord::new("PE-3B", "体育二（三下）"),
        ])
    }

    #[test]
    fn selects_variant_for_grade_and_term() {
        let index = physical_education();
        let variants = index.variants("体育二").expect("variants present");
        let mut diagnostics = Diagnostics::new();

        let course = match_course(variants, '三', "上", "体育二", AT, &mut diagnostics);
        assert_eq!(course.map(|c| c.id.as_str()), Some("PE-3"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn first_matching_variant_wins() {
        let index = CourseIndex::build([
            CourseRecord::new("A", "美术（四上）"),
            CourseRecord::new("B", "美术（四上 社团）"),
        ]);
        let variants = index.variants("美术").expect("variants present");
        let mut diagnostics = Diagnostics::new();

        let course = match_course(variants, '四', "上", "美术", AT, &mut diagnostics);
        assert_eq!(course.map(|c| c.id.as_str()), Some("A"));
    }

    #[test]
    fn missing_variant_is_recorded_not_fatal() {
        let index = physical_education();
        let variants = index.variants("体育二").expect("variants present");
        let mut diagnostics = Diagnostics::new();

        let course = match_course(variants, '五', "上", "体育二（x）", AT, &mut diagnostics);
        assert!(course.is_none());
        assert_eq!(
            diagnostics.entries()[0].kind,
            DiagnosticKind::UnmatchedCourseVariant {
                row: 1,
                column: 1,
                course: "体育二（x）".into(),
                grade: '五',
            }
        );
    }

    #[test]
    fn second_term_marker_reaches_second_term_variants() {
        let index = physical_education();
        let variants = index.variants("体育二").expect("variants present");
        let mut diagnostics = Diagnostics::new();

        let course = match_course(variants, '三', "下", "体育二", AT, &mut diagnostics);
        assert_eq!(course.map(|c| c.id.as_str()), Some("PE-3B"));
    }

    #[test]
    fn class_lookup_distinguishes_empty_label_and_unknown_class() {
        let classes = ClassIndex::build([ClassRecord::new("K31", "三1班")]);
        let header = Row::from_texts(["课程", "三1班", "", "三9班"]);
        let mut diagnostics = Diagnostics::new();

        let found = match_class(&header, 1, &classes, "s", &mut diagnostics);
        assert_eq!(found.map(|c| c.id.as_str()), Some("K31"));
        assert!(match_class(&header, 2, &classes, "s", &mut diagnostics).is_none());
        assert!(match_class(&header, 3, &classes, "s", &mut diagnostics).is_none());
        assert!(match_class(&header, 7, &classes, "s", &mut diagnostics).is_none());

        let kinds: Vec<&DiagnosticKind> = diagnostics.entries().iter().map(|d| &d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &DiagnosticKind::MissingClassName { column: 2 },
                &DiagnosticKind::UnknownClass {
                    column: 3,
                    class: "三9班".into()
                },
                &DiagnosticKind::MissingClassName { column: 7 },
            ]
        );
    }
}
