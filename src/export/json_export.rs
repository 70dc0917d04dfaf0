//! JSON export of stopping results.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::config::Parameters;
use crate::solver::{StopOutcome, StopScenario};

/// Full report of one stop
#[derive(Debug, Clone, Serialize)]
pub struct StopReport {
    /// Export timestamp
    pub exported_at: String,
    /// Export version for compatibility
    pub version: &'static str,
    pub parameters: Parameters,
    pub scenario: StopScenario,
    pub outcome: StopOutcome,
}

impl StopReport {
    pub fn new(parameters: &Parameters, scenario: &StopScenario, outcome: &StopOutcome) -> Self {
        Self {
            exported_at: Local::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
            parameters: parameters.clone(),
            scenario: *scenario,
            outcome: outcome.clone(),
        }
    }
}

/// Export a stop report to `exports/stop_YYYYMMDD_HHMMSS.json`
///
/// Returns the path to the saved JSON file.
pub fn export_stop_json(report: &StopReport) -> Result<PathBuf> {
    let dir = PathBuf::from("exports");
    std::fs::create_dir_all(&dir)?;

    let filename = format!("stop_{}.json", Local::now().format("%Y%m%d_%H%M%S"));
    let path = dir.join(filename);
    export_stop_json_to(report, &path)?;
    Ok(path)
}

/// Export a stop report to a specific file
pub fn export_stop_json_to(report: &StopReport, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;

    log::info!("Stop report exported: {}", path.display());
    Ok(())
}
