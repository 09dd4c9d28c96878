//! Loading of the template workbook that gives every output sheet its
//! header, labels and formatting.
//!
//! The packaged template is a serialized [`Workbook`] model embedded in the
//! binary. Callers may supply their own either as a JSON model or as an XLSX
//! file; both keep values, formulas, styles, column widths and row heights.

use std::fs;
use std::path::Path;

use tracing::{debug, instrument};

use crate::error::{Result, ToolError};
use crate::io::xlsx_template;
use crate::model::Workbook;

const PACKAGED_TEMPLATE: &str = include_str!("../../../../templates/template.json");

/// The template shipped with the tool, one sheet per grade.
pub fn packaged_template() -> Result<Workbook> {
    parse_template_json(PACKAGED_TEMPLATE)
}

/// Loads a template from disk, choosing the format from the file extension.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn load_template(path: &Path) -> Result<Workbook> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let template = match extension.as_deref() {
        Some("json") => parse_template_json(&fs::read_to_string(path)?)?,
        Some("xlsx") | Some("xlsm") => xlsx_template::read_styled_workbook(path)?,
        _ => {
            return Err(ToolError::InvalidArgument(format!(
                "unsupported template format: {}",
                path.display()
            )));
        }
    };
    debug!(sheets = template.sheets.len(), "template loaded");
    Ok(template)
}

/// Writes a template model as pretty JSON so it can be edited and reloaded.
pub fn save_template_json(path: &Path, template: &Workbook) -> Result<()> {
    let json = serde_json::to_string_pretty(template)?;
    fs::write(path, json)?;
    Ok(())
}

fn parse_template_json(source: &str) -> Result<Workbook> {
    let template: Workbook = serde_json::from_str(source)?;
    let mut seen = std::collections::HashSet::new();
    for name in template.sheet_names() {
        if !seen.insert(name) {
            return Err(ToolError::InvalidWorkbook(format!(
                "template sheet '{name}' is defined twice"
            )));
        }
    }
    Ok(template)
}
