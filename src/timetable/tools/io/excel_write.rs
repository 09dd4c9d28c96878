use std::path::Path;

use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatUnderline, Formula, Workbook as XlsxWorkbook,
    Worksheet,
};
use tracing::debug;

use crate::error::Result;
use crate::model::{
    BorderLine, Cell, CellStyle, CellValue, HorizontalAlign, Sheet, VerticalAlign, Workbook,
};

/// Writes the workbook model to the given path.
pub fn write_workbook(path: &Path, workbook: &Workbook) -> Result<()> {
    let mut writer = build_writer(workbook)?;
    writer.save(path)?;
    Ok(())
}

/// Serialises the workbook model into XLSX bytes.
pub fn workbook_to_bytes(workbook: &Workbook) -> Result<Vec<u8>> {
    let mut writer = build_writer(workbook)?;
    Ok(writer.save_to_buffer()?)
}

fn build_writer(workbook: &Workbook) -> Result<XlsxWorkbook> {
    let mut writer = XlsxWorkbook::new();
    for sheet in &workbook.sheets {
        let worksheet = writer.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_sheet(worksheet, sheet)?;
        debug!(sheet = %sheet.name, rows = sheet.row_count(), "sheet written");
    }
    Ok(writer)
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet) -> Result<()> {
    for (col, width) in &sheet.column_widths {
        worksheet.set_column_width(*col, *width)?;
    }

    for (row_index, row) in &sheet.rows {
        if let Some(height) = row.height {
            worksheet.set_row_height(*row_index, height)?;
        }
        for (col, cell) in &row.cells {
            write_cell(worksheet, *row_index, *col, cell)?;
        }
    }
    Ok(())
}

// Every cell gets a format of its own, built from the model style.
fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    let format = to_format(&cell.style);
    match &cell.value {
        CellValue::Text(text) => {
            worksheet.write_string_with_format(row, col, text, &format)?;
        }
        CellValue::Number(number) => {
            worksheet.write_number_with_format(row, col, *number, &format)?;
        }
        CellValue::Boolean(flag) => {
            worksheet.write_boolean_with_format(row, col, *flag, &format)?;
        }
        CellValue::Formula { formula, cached } => {
            let mut formula = Formula::new(formula);
            if let Some(result) = cached.as_deref().and_then(cached_result) {
                formula = formula.set_result(result);
            }
            worksheet.write_formula_with_format(row, col, formula, &format)?;
        }
        CellValue::Blank => {
            worksheet.write_blank(row, col, &format)?;
        }
    }
    Ok(())
}

fn cached_result(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Text(text) => Some(text.clone()),
        CellValue::Number(number) => Some(number.to_string()),
        CellValue::Boolean(flag) => Some(if *flag { "TRUE" } else { "FALSE" }.to_string()),
        CellValue::Formula { cached, .. } => cached.as_deref().and_then(cached_result),
        CellValue::Blank => None,
    }
}

/// Translates a model style into a fresh writer format.
pub fn to_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    let font = &style.font;
    if let Some(name) = &font.name {
        format = format.set_font_name(name);
    }
    if let Some(size) = font.size {
        format = format.set_font_size(size);
    }
    if font.bold {
        format = format.set_bold();
    }
    if font.italic {
        format = format.set_italic();
    }
    if font.underline {
        format = format.set_underline(FormatUnderline::Single);
    }
    if font.strikethrough {
        format = format.set_font_strikethrough();
    }
    if let Some(color) = font.color {
        format = format.set_font_color(Color::RGB(color));
    }
    if let Some(fill) = style.fill {
        format = format.set_background_color(Color::RGB(fill));
    }

    format = match style.horizontal {
        HorizontalAlign::General => format,
        HorizontalAlign::Left => format.set_align(FormatAlign::Left),
        HorizontalAlign::Center => format.set_align(FormatAlign::Center),
        HorizontalAlign::Right => format.set_align(FormatAlign::Right),
        HorizontalAlign::Justify => format.set_align(FormatAlign::Justify),
    };
    format = match style.vertical {
        VerticalAlign::Top => format.set_align(FormatAlign::Top),
        VerticalAlign::Center => format.set_align(FormatAlign::VerticalCenter),
        VerticalAlign::Bottom => format,
    };
    if style.wrap {
        format = format.set_text_wrap();
    }

    let borders = &style.borders;
    if let Some(line) = border(borders.top) {
        format = format.set_border_top(line);
    }
    if let Some(line) = border(borders.bottom) {
        format = format.set_border_bottom(line);
    }
    if let Some(line) = border(borders.left) {
        format = format.set_border_left(line);
    }
    if let Some(line) = border(borders.right) {
        format = format.set_border_right(line);
    }

    if let Some(code) = &style.number_format {
        format = format.set_num_format(code);
    }
    format
}

fn border(line: BorderLine) -> Option<FormatBorder> {
    match line {
        BorderLine::None => None,
        BorderLine::Thin => Some(FormatBorder::Thin),
        BorderLine::Medium => Some(FormatBorder::Medium),
        BorderLine::Thick => Some(FormatBorder::Thick),
        BorderLine::Dashed => Some(FormatBorder::Dashed),
        BorderLine::Dotted => Some(FormatBorder::Dotted),
        BorderLine::Double => Some(FormatBorder::Double),
        BorderLine::Hair => Some(FormatBorder::Hair),
    }
}
