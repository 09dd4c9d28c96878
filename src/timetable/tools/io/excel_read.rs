use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use tracing::{debug, trace};

use crate::error::Result;
use crate::model::{Cell, CellStyle, CellValue, ColIndex, RowIndex, Sheet, Workbook};

/// Number format attached to cells calamine reports as dates, so the display
/// rule renders them as timestamps.
const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const DURATION_FORMAT: &str = "[h]:mm:ss";

/// Reads every sheet of an XLSX file into the spreadsheet model.
pub fn read_workbook(path: &Path) -> Result<Workbook> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    read_all_sheets(&mut workbook)
}

/// Reads an XLSX document held in memory, such as an uploaded file.
pub fn read_workbook_from_bytes(bytes: &[u8]) -> Result<Workbook> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    read_all_sheets(&mut workbook)
}

/// Cell values, cached formula results and formula text are read; calamine
/// does not expose cell formats, so styles are left at their default except
/// for the number format of date cells.
pub(crate) fn read_all_sheets<R: Read + Seek>(workbook: &mut Xlsx<R>) -> Result<Workbook> {
    let mut model = Workbook::new();
    for name in workbook.sheet_names() {
        let values = workbook.worksheet_range(&name)?;
        let formulas = workbook.worksheet_formula(&name)?;
        let sheet = build_sheet(&name, &values, &formulas);
        debug!(sheet = %name, rows = sheet.row_count(), "sheet read");
        model.push_sheet(sheet);
    }
    Ok(model)
}

pub(crate) fn build_sheet(name: &str, values: &Range<Data>, formulas: &Range<String>) -> Sheet {
    let mut sheet = Sheet::new(name);

    if let Some((start_row, start_col)) = values.start() {
        for (row, col, data) in values.used_cells() {
            let (row, col) = absolute(start_row, start_col, row, col);
            match data_to_cell(data) {
                Some(cell) => sheet.set_cell(row, col, cell),
                None => trace!(sheet = name, row, col, "dropping error cell"),
            }
        }
    }

    if let Some((start_row, start_col)) = formulas.start() {
        for (row, col, formula) in formulas.used_cells() {
            if formula.is_empty() {
                continue;
            }
            let (row, col) = absolute(start_row, start_col, row, col);
            let cached = sheet.take_cell(row, col);
            let style = cached
                .as_ref()
                .map(|cell| cell.style.clone())
                .unwrap_or_default();
            let value = CellValue::Formula {
                formula: formula.trim_start_matches('=').to_string(),
                cached: cached
                    .map(|cell| cell.value)
                    .filter(|value| *value != CellValue::Blank)
                    .map(Box::new),
            };
            sheet.set_cell(row, col, Cell::with_style(value, style));
        }
    }

    sheet
}

fn absolute(start_row: u32, start_col: u32, row: usize, col: usize) -> (RowIndex, ColIndex) {
    (
        start_row + row as RowIndex,
        (start_col as usize + col) as ColIndex,
    )
}

/// Maps a calamine cell onto the model. Error cells have no model equivalent
/// and are dropped.
pub(crate) fn data_to_cell(data: &Data) -> Option<Cell> {
    let cell = match data {
        Data::String(value) => Cell::new(CellValue::Text(value.clone())),
        Data::Float(value) => Cell::new(CellValue::Number(*value)),
        Data::Int(value) => Cell::new(CellValue::Number(*value as f64)),
        Data::Bool(value) => Cell::new(CellValue::Boolean(*value)),
        Data::DateTime(value) => {
            let format = if value.is_duration() {
                DURATION_FORMAT
            } else {
                DATE_TIME_FORMAT
            };
            Cell::with_style(
                CellValue::Number(value.as_f64()),
                CellStyle {
                    number_format: Some(format.to_string()),
                    ..CellStyle::default()
                },
            )
        }
        Data::DateTimeIso(value) | Data::DurationIso(value) => {
            Cell::new(CellValue::Text(value.clone()))
        }
        Data::Empty => Cell::new(CellValue::Blank),
        Data::Error(_) => return None,
    };
    Some(cell)
}
