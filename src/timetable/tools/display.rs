//! The single cell-to-text rule used wherever a cell is read as a key.
//!
//! Header labels, course names and teacher names all go through
//! [`display_text`], so matching never depends on how the authoring tool last
//! saved cached formula values.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::model::{Cell, CellStyle, CellValue};

/// Largest magnitude that still round-trips through `i64` exactly enough to be
/// printed as an integer.
const INTEGRAL_LIMIT: f64 = 9.007_199_254_740_992e15;

/// Renders an optional cell as normalized text. Absent cells are empty.
pub fn display_text(cell: Option<&Cell>) -> String {
    match cell {
        Some(cell) => value_text(&cell.value, &cell.style),
        None => String::new(),
    }
}

/// Renders a value with the style it is displayed with.
pub fn value_text(value: &CellValue, style: &CellStyle) -> String {
    match value {
        CellValue::Text(text) => trim_control(text).to_string(),
        CellValue::Number(number) if style.is_date_formatted() => excel_serial_to_datetime(*number)
            .map(|datetime| datetime.to_string())
            .unwrap_or_else(|| number_text(*number)),
        CellValue::Number(number) => number_text(*number),
        CellValue::Boolean(flag) => flag.to_string(),
        CellValue::Formula { cached, .. } => match cached {
            Some(result) => value_text(result, style),
            None => String::new(),
        },
        CellValue::Blank => String::new(),
    }
}

/// Strips spaces and control characters (anything up to U+0020) from both
/// ends. Full-width and other Unicode spaces are kept.
fn trim_control(text: &str) -> &str {
    text.trim_matches(|c: char| c <= ' ')
}

/// Integral values print without a fractional part, others with the default
/// float formatting.
pub fn number_text(number: f64) -> String {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < INTEGRAL_LIMIT {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

/// Converts a 1900-system Excel serial date into a timestamp.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}
