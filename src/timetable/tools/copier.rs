//! Structural copy of a template sheet into an output sheet.

use tracing::debug;

use crate::model::{Cell, CellValue, Row, Sheet};

/// Reproduces every row and cell present in `template` inside `output`.
///
/// Absent rows and cells stay absent. Each copied cell receives its own clone
/// of the template style, and formulas keep their text but drop any cached
/// result so the output never carries stale values.
pub fn copy_sheet(template: &Sheet, output: &mut Sheet) {
    for (col, width) in &template.column_widths {
        output.column_widths.insert(*col, *width);
    }

    for (row_index, template_row) in &template.rows {
        let mut row = Row {
            height: template_row.height,
            ..Row::default()
        };
        for (col, template_cell) in &template_row.cells {
            row.set(*col, copy_cell(template_cell));
        }
        output.insert_row(*row_index, row);
    }

    debug!(
        template = %template.name,
        rows = template.row_count(),
        "template structure copied"
    );
}

fn copy_cell(template: &Cell) -> Cell {
    let value = match &template.value {
        CellValue::Text(text) => CellValue::Text(text.clone()),
        CellValue::Number(number) => CellValue::Number(*number),
        CellValue::Boolean(flag) => CellValue::Boolean(*flag),
        CellValue::Formula { formula, .. } => CellValue::formula(formula.clone()),
        CellValue::Blank => CellValue::Blank,
    };
    Cell::with_style(value, template.style.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BorderLine, Borders, CellStyle, FontStyle, HorizontalAlign};

    fn header_style() -> CellStyle {
        CellStyle {
            font: FontStyle {
                bold: true,
                color: Some(0x1F4E79),
                ..FontStyle::default()
            },
            fill: Some(0xDDEBF7),
            horizontal: HorizontalAlign::Center,
            borders: Borders::all(BorderLine::Thin),
            ..CellStyle::default()
        }
    }

    fn template() -> Sheet {
        let mut sheet = Sheet::new("一年级");
        sheet.column_widths.insert(1, 18.0);
        sheet.set_cell(
            0,
            0,
            Cell::with_style(CellValue::text("教师编号"), header_style()),
        );
        sheet.set_cell(0, 2, Cell::new(CellValue::Number(60.0)));
        sheet.set_cell(0, 3, Cell::new(CellValue::Boolean(true)));
        sheet.set_cell(
            2,
            1,
            Cell::new(CellValue::Formula {
                formula: "SUM(A1:A2)".into(),
                cached: Some(Box::new(CellValue::Number(3.0))),
            }),
        );
        let mut blank = Cell::new(CellValue::Blank);
        blank.style.number_format = Some("yyyy-mm-dd".into());
        sheet.set_cell(2, 4, blank);
        sheet.row_mut(2).height = Some(24.0);
        sheet
    }

    #[test]
    fn copies_values_styles_and_layout() {
        let template = template();
        let mut output = Sheet::new("一年级");
        copy_sheet(&template, &mut output);

        assert_eq!(output.column_widths, template.column_widths);
        assert_eq!(output.row(2).and_then(|r| r.height), Some(24.0));
        assert_eq!(output.cell(0, 0), template.cell(0, 0));
        assert_eq!(output.cell(0, 2), template.cell(0, 2));
        assert_eq!(output.cell(0, 3), template.cell(0, 3));
        assert_eq!(output.cell(2, 4), template.cell(2, 4));
        assert_eq!(
            output.cell(0, 0).map(|c| &c.style),
            Some(&header_style())
        );
    }

    #[test]
    fn formula_text_is_copied_without_cached_result() {
        let template = template();
        let mut output = Sheet::new("一年级");
        copy_sheet(&template, &mut output);

        assert_eq!(
            output.cell(2, 1).map(|c| &c.value),
            Some(&CellValue::formula("SUM(A1:A2)"))
        );
    }

    #[test]
    fn absent_rows_and_cells_are_not_padded() {
        let template = template();
        let mut output = Sheet::new("一年级");
        copy_sheet(&template, &mut output);

        assert!(output.row(1).is_none());
        assert!(output.cell(0, 1).is_none());
        assert_eq!(output.row_count(), 2);
    }

    #[test]
    fn output_style_is_independent_of_template() {
        let template = template();
        let mut output = Sheet::new("一年级");
        copy_sheet(&template, &mut output);

        if let Some(cell) = output.rows.get_mut(&0).and_then(|r| r.cells.get_mut(&0)) {
            cell.style.font.bold = false;
        }
        assert!(template.cell(0, 0).is_some_and(|c| c.style.font.bold));
    }
}
