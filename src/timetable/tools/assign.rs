use std::fs;
use std::path::Path;

use tracing::{info, instrument};

use crate::config::PipelineConfig;
use crate::error::{Result, ToolError};
use crate::io::excel_read;
use crate::io::excel_write;
use crate::io::reference::{ReferenceSource, open_reference};
use crate::io::template::{load_template, packaged_template};
use crate::model::Workbook;
use crate::pipeline::{AssignmentReport, assign_workbook};

/// Content type returned with every generated workbook.
pub const CONTENT_TYPE: &str = "application/octet-stream";

/// A generated workbook ready to hand back to the caller as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// The downloadable workbook together with what happened while building it.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub file: GeneratedFile,
    pub report: AssignmentReport,
}

/// Turns an uploaded schedule workbook into the assignment workbook.
///
/// Reference data is loaded through `reference` on every call so each
/// request sees the current tables.
#[instrument(level = "info", skip_all, fields(upload_bytes = upload.len()))]
pub fn assign_upload(
    upload: &[u8],
    reference: &dyn ReferenceSource,
    template: &Workbook,
    config: &PipelineConfig,
) -> Result<UploadOutcome> {
    if upload.is_empty() {
        return Err(ToolError::EmptyUpload);
    }
    config.validate()?;

    let input = excel_read::read_workbook_from_bytes(upload)?;
    let index = reference.load_index()?;
    let report = assign_workbook(&input, template, &index, config);
    let bytes = excel_write::workbook_to_bytes(&report.workbook)?;
    info!(
        assignments = report.total_assignments(),
        diagnostics = report.diagnostics.len(),
        output_bytes = bytes.len(),
        "assignment workbook generated"
    );

    Ok(UploadOutcome {
        file: GeneratedFile {
            file_name: config.output_file_name.clone(),
            content_type: CONTENT_TYPE,
            bytes,
        },
        report,
    })
}

/// Reads the schedule at `input`, writes the assignment workbook to `output`.
///
/// Without `template` the packaged template is used.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn assign_file(
    input: &Path,
    reference: &Path,
    template: Option<&Path>,
    output: &Path,
    config: &PipelineConfig,
) -> Result<AssignmentReport> {
    if !input.exists() {
        return Err(ToolError::MissingInput(input.to_path_buf()));
    }
    let upload = fs::read(input)?;
    let source = open_reference(reference)?;
    let template = match template {
        Some(path) => load_template(path)?,
        None => packaged_template()?,
    };

    let outcome = assign_upload(&upload, source.as_ref(), &template, config)?;
    fs::write(output, &outcome.file.bytes)?;
    Ok(outcome.report)
}
