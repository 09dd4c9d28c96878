use std::collections::BTreeMap;

use crate::display::display_text;
use crate::model::{ColIndex, Row};

/// Column index → grade token, derived once per sheet from its header row.
pub type GradeMap = BTreeMap<ColIndex, char>;

/// First column holding class labels; column 0 carries the course names.
pub const FIRST_DATA_COLUMN: ColIndex = 1;

/// Reads the grade of every class column from the header row.
///
/// The grade is the first character of the header label, even when the label
/// starts with a multi-digit number. Columns whose label is empty are left out
/// of the map.
pub fn resolve_grades(header: &Row) -> GradeMap {
    (FIRST_DATA_COLUMN..header.cell_end())
        .filter_map(|col| {
            display_text(header.cell(col))
                .chars()
                .next()
                .map(|grade| (col, grade))
        })
        .collect()
}
