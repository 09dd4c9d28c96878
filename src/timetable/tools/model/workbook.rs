use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Zero-based row index, matching the Excel row numbering minus one.
pub type RowIndex = u32;
/// Zero-based column index.
pub type ColIndex = u16;

/// Typed content of a single cell.
///
/// The set of variants is closed; every consumer matches it exhaustively so a
/// new kind of cell cannot silently degrade to a blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    /// Plain string literal.
    Text(String),
    /// Floating point number. Dates are numbers carrying a date number format.
    Number(f64),
    /// Boolean literal.
    Boolean(bool),
    /// Formula text (without the leading `=`) and the last cached result, if
    /// the authoring tool stored one.
    Formula {
        formula: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cached: Option<Box<CellValue>>,
    },
    /// A present cell without content; usually carries only a style.
    Blank,
}

impl CellValue {
    /// Creates a text value.
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Creates a formula value without a cached result.
    pub fn formula(formula: impl Into<String>) -> Self {
        CellValue::Formula {
            formula: formula.into(),
            cached: None,
        }
    }
}

/// Horizontal alignment of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlign {
    #[default]
    General,
    Left,
    Center,
    Right,
    Justify,
}

/// Vertical alignment of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    Top,
    Center,
    #[default]
    Bottom,
}

/// Line style of one cell edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderLine {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
}

/// Per-edge border lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Borders {
    pub top: BorderLine,
    pub bottom: BorderLine,
    pub left: BorderLine,
    pub right: BorderLine,
}

impl Borders {
    /// Applies the same line to all four edges.
    pub fn all(line: BorderLine) -> Self {
        Self {
            top: line,
            bottom: line,
            left: line,
            right: line,
        }
    }
}

/// Font attributes of a cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FontStyle {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    /// RGB colour as `0xRRGGBB`.
    pub color: Option<u32>,
}

/// Visual style of a cell. Every cell owns its style by value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CellStyle {
    pub font: FontStyle,
    /// Solid background colour as `0xRRGGBB`.
    pub fill: Option<u32>,
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
    pub wrap: bool,
    pub borders: Borders,
    /// Excel number format code such as `yyyy-mm-dd` or `0.00`.
    pub number_format: Option<String>,
}

impl CellStyle {
    /// Whether the number format renders the numeric value as a date or time.
    pub fn is_date_formatted(&self) -> bool {
        self.number_format
            .as_deref()
            .is_some_and(is_date_format)
    }

    pub fn is_default(&self) -> bool {
        self == &CellStyle::default()
    }
}

/// Heuristic used by spreadsheet tools: a format is a date format when,
/// outside quoted literals and bracketed sections, it uses one of the date or
/// time placeholders.
pub fn is_date_format(code: &str) -> bool {
    if code.eq_ignore_ascii_case("general") {
        return false;
    }

    let mut in_quotes = false;
    let mut in_brackets = false;
    let mut previous = '\0';
    for ch in code.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '[' if !in_quotes => in_brackets = true,
            ']' if !in_quotes => in_brackets = false,
            _ if in_quotes || in_brackets || previous == '\\' => {}
            'y' | 'Y' | 'm' | 'M' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' => return true,
            _ => {}
        }
        previous = ch;
    }
    false
}

/// A single cell: typed value plus the style it is rendered with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    #[serde(default, skip_serializing_if = "CellStyle::is_default")]
    pub style: CellStyle,
}

impl Cell {
    /// Creates a cell with the default style.
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            style: CellStyle::default(),
        }
    }

    pub fn with_style(value: CellValue, style: CellStyle) -> Self {
        Self { value, style }
    }
}

/// A sparse row. Absent columns have no cell at all.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub cells: BTreeMap<ColIndex, Cell>,
}

impl Row {
    /// Builds a row of text cells starting at column 0.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row = Row::default();
        for (col, text) in texts.into_iter().enumerate() {
            row.set(col as ColIndex, Cell::new(CellValue::text(text)));
        }
        row
    }

    pub fn cell(&self, col: ColIndex) -> Option<&Cell> {
        self.cells.get(&col)
    }

    pub fn set(&mut self, col: ColIndex, cell: Cell) {
        self.cells.insert(col, cell);
    }

    /// One past the last present column, or 0 for a row without cells.
    pub fn cell_end(&self) -> ColIndex {
        self.cells
            .last_key_value()
            .map_or(0, |(col, _)| col.saturating_add(1))
    }
}

/// A named sheet holding sparse rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    #[serde(default)]
    pub column_widths: BTreeMap<ColIndex, f64>,
    #[serde(default)]
    pub rows: BTreeMap<RowIndex, Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_widths: BTreeMap::new(),
            rows: BTreeMap::new(),
        }
    }

    pub fn row(&self, index: RowIndex) -> Option<&Row> {
        self.rows.get(&index)
    }

    /// Returns the row at `index`, creating an empty one if it is absent.
    pub fn row_mut(&mut self, index: RowIndex) -> &mut Row {
        self.rows.entry(index).or_default()
    }

    pub fn insert_row(&mut self, index: RowIndex, row: Row) {
        self.rows.insert(index, row);
    }

    pub fn cell(&self, row: RowIndex, col: ColIndex) -> Option<&Cell> {
        self.row(row).and_then(|row| row.cell(col))
    }

    pub fn set_cell(&mut self, row: RowIndex, col: ColIndex, cell: Cell) {
        self.row_mut(row).set(col, cell);
    }

    pub fn take_cell(&mut self, row: RowIndex, col: ColIndex) -> Option<Cell> {
        self.rows
            .get_mut(&row)
            .and_then(|row| row.cells.remove(&col))
    }

    pub fn last_row_index(&self) -> Option<RowIndex> {
        self.rows.last_key_value().map(|(index, _)| *index)
    }

    /// Appends a row directly below the last present row (row 0 for an empty
    /// sheet) and returns its index.
    pub fn append_row(&mut self, row: Row) -> RowIndex {
        let index = self.last_row_index().map_or(0, |last| last + 1);
        self.rows.insert(index, row);
        index
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// An ordered collection of uniquely named sheets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Adds a sheet, replacing any existing sheet with the same name.
    pub fn push_sheet(&mut self, sheet: Sheet) -> &mut Sheet {
        let position = match self.sheets.iter().position(|s| s.name == sheet.name) {
            Some(position) => {
                self.sheets[position] = sheet;
                position
            }
            None => {
                self.sheets.push(sheet);
                self.sheets.len() - 1
            }
        };
        &mut self.sheets[position]
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str())
    }
}
