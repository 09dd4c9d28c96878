use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};

/// Settings of an assignment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Suffix appended to a column's grade to select the course variant, e.g.
    /// grade `三` + `上` selects variants annotated `（三上）`.
    ///
    /// Only one term is matched per run; variants of other terms are never
    /// reachable with the same marker.
    pub term_marker: String,
    /// Written into every output row as the upper enrolment bound.
    pub max_capacity: u32,
    /// Written into every output row as the lower enrolment bound.
    pub min_capacity: u32,
    /// Filename suggested to the caller for the generated workbook.
    pub output_file_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            term_marker: "上".to_string(),
            max_capacity: 60,
            min_capacity: 30,
            output_file_name: "课表.xlsx".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Loads a JSON configuration file; absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.term_marker.is_empty() {
            return Err(ToolError::InvalidArgument(
                "term marker must not be empty".into(),
            ));
        }
        if self.min_capacity > self.max_capacity {
            return Err(ToolError::InvalidArgument(format!(
                "minimum capacity {} exceeds maximum capacity {}",
                self.min_capacity, self.max_capacity
            )));
        }
        Ok(())
    }
}
