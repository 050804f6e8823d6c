//! JSON export of a finished run.
//!
//! Written on request (`--export`) after the replay, for feeding the
//! projections into other tools.

use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::logging::{self, Component};
use crate::model::MonitorError;
use crate::simulation::RunSummary;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub generated_at: String,
    pub data_file: String,
    pub series_len: usize,
    #[serde(flatten)]
    pub summary: &'a RunSummary,
}

impl<'a> RunReport<'a> {
    pub fn new(data_file: &Path, series_len: usize, summary: &'a RunSummary) -> Self {
        RunReport {
            generated_at: Utc::now().to_rfc3339(),
            data_file: data_file.display().to_string(),
            series_len,
            summary,
        }
    }

    pub fn to_json(&self) -> Result<String, MonitorError> {
        serde_json::to_string_pretty(self).map_err(|e| MonitorError::Io(e.to_string()))
    }
}

/// Writes the report to `path`, replacing any previous file.
pub fn write_report(path: &Path, report: &RunReport<'_>) -> Result<(), MonitorError> {
    let json = report.to_json()?;
    std::fs::write(path, json).map_err(|e| MonitorError::Io(format!("{}: {}", path.display(), e)))?;
    logging::info(Component::Export, Some(&path.display().to_string()), "Run report written");
    Ok(())
}
