//! Reads an XLSX template with its formatting.
//!
//! calamine only exposes values, so templates go through umya-spreadsheet,
//! which also yields fonts, fills, alignment, borders, number formats, column
//! widths and row heights. Styled blank cells are kept.

use std::path::Path;

use tracing::debug;
use umya_spreadsheet::{HorizontalAlignmentValues, VerticalAlignmentValues, Worksheet};

use crate::error::{Result, ToolError};
use crate::model::{
    BorderLine, Borders, Cell, CellStyle, CellValue, ColIndex, FontStyle, HorizontalAlign,
    RowIndex, Sheet, VerticalAlign, Workbook,
};

/// Reads every sheet of an XLSX template, values and styles alike.
pub fn read_styled_workbook(path: &Path) -> Result<Workbook> {
    let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|error| {
        ToolError::InvalidWorkbook(format!("cannot read template {}: {error}", path.display()))
    })?;

    let mut model = Workbook::new();
    for worksheet in book.get_sheet_collection() {
        let sheet = read_sheet(worksheet);
        debug!(
            sheet = %sheet.name,
            rows = sheet.row_count(),
            widths = sheet.column_widths.len(),
            "styled template sheet read"
        );
        model.push_sheet(sheet);
    }
    Ok(model)
}

// umya counts rows and columns from 1.
fn read_sheet(worksheet: &Worksheet) -> Sheet {
    let mut sheet = Sheet::new(worksheet.get_name());

    for column in worksheet.get_column_dimensions() {
        let number: u32 = column.get_col_num().to_owned();
        let width: f64 = column.get_width().to_owned();
        if number > 0 && width > 0.0 {
            sheet
                .column_widths
                .insert((number - 1) as ColIndex, width);
        }
    }

    for row in worksheet.get_row_dimensions() {
        let number: u32 = row.get_row_num().to_owned();
        let height: f64 = row.get_height().to_owned();
        if number > 0 && height > 0.0 {
            sheet.row_mut((number - 1) as RowIndex).height = Some(height);
        }
    }

    for cell in worksheet.get_cell_collection() {
        let coordinate = cell.get_coordinate();
        let col: u32 = coordinate.get_col_num().to_owned();
        let row: u32 = coordinate.get_row_num().to_owned();
        if col == 0 || row == 0 {
            continue;
        }

        let formula: String = cell.get_formula().to_owned();
        let value = if !formula.is_empty() {
            CellValue::formula(formula.trim_start_matches('='))
        } else {
            let text = cell.get_value().to_string();
            if text.is_empty() {
                CellValue::Blank
            } else if cell.get_data_type() == "b" {
                CellValue::Boolean(text.eq_ignore_ascii_case("true") || text == "1")
            } else {
                match cell.get_value_number() {
                    Some(number) => CellValue::Number(number),
                    None => CellValue::Text(text),
                }
            }
        };

        let style = read_style(cell.get_style());
        sheet.set_cell(
            (row - 1) as RowIndex,
            (col - 1) as ColIndex,
            Cell::with_style(value, style),
        );
    }

    sheet
}

fn read_style(style: &umya_spreadsheet::Style) -> CellStyle {
    let mut model = CellStyle::default();

    if let Some(font) = style.get_font() {
        let name: String = font.get_name().to_owned();
        let size: f64 = font.get_size().to_owned();
        let underline: String = font.get_underline().to_owned();
        model.font = FontStyle {
            name: Some(name).filter(|name| !name.is_empty()),
            size: Some(size).filter(|size| *size > 0.0),
            bold: font.get_bold().to_owned(),
            italic: font.get_italic().to_owned(),
            underline: !matches!(underline.as_str(), "" | "none"),
            strikethrough: font.get_strikethrough().to_owned(),
            color: rgb(font.get_color().get_argb()),
        };
    }

    model.fill = style
        .get_fill()
        .and_then(|fill| fill.get_pattern_fill())
        .and_then(|pattern| pattern.get_foreground_color())
        .and_then(|color| rgb(color.get_argb()));

    if let Some(alignment) = style.get_alignment() {
        model.horizontal = match alignment.get_horizontal() {
            HorizontalAlignmentValues::Left => HorizontalAlign::Left,
            HorizontalAlignmentValues::Center | HorizontalAlignmentValues::CenterContinuous => {
                HorizontalAlign::Center
            }
            HorizontalAlignmentValues::Right => HorizontalAlign::Right,
            HorizontalAlignmentValues::Justify | HorizontalAlignmentValues::Distributed => {
                HorizontalAlign::Justify
            }
            _ => HorizontalAlign::General,
        };
        model.vertical = match alignment.get_vertical() {
            VerticalAlignmentValues::Top => VerticalAlign::Top,
            VerticalAlignmentValues::Center => VerticalAlign::Center,
            _ => VerticalAlign::Bottom,
        };
        model.wrap = alignment.get_wrap_text().to_owned();
    }

    if let Some(borders) = style.get_borders() {
        model.borders = Borders {
            top: border_line(borders.get_top().get_border_style()),
            bottom: border_line(borders.get_bottom().get_border_style()),
            left: border_line(borders.get_left().get_border_style()),
            right: border_line(borders.get_right().get_border_style()),
        };
    }

    model.number_format = style
        .get_number_format()
        .map(|format| format.get_format_code().to_owned())
        .filter(|code: &String| !code.is_empty() && !code.eq_ignore_ascii_case("general"));

    model
}

/// `AARRGGBB` or `RRGGBB` to a 24-bit colour. Theme and indexed colours carry
/// no ARGB value and are ignored.
fn rgb(argb: &str) -> Option<u32> {
    let hex = argb.get(argb.len().checked_sub(6)?..)?;
    u32::from_str_radix(hex, 16).ok()
}

fn border_line(style: &str) -> BorderLine {
    match style {
        "thin" => BorderLine::Thin,
        "medium" | "mediumDashed" | "mediumDashDot" | "mediumDashDotDot" => BorderLine::Medium,
        "thick" => BorderLine::Thick,
        "dashed" | "dashDot" | "dashDotDot" | "slantDashDot" => BorderLine::Dashed,
        "dotted" => BorderLine::Dotted,
        "double" => BorderLine::Double,
        "hair" => BorderLine::Hair,
        _ => BorderLine::None,
    }
}
