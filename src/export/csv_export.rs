//! CSV export of stopping-simulator traces.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use crate::state::{EnergyStep, RunSample, SimulationRun};

/// Row written for each integrator sample
#[derive(Debug, Clone, Serialize)]
pub struct TraceRecord {
    /// Elapsed time (s)
    pub time_sec: f64,
    /// Speed (m/s)
    pub velocity_m_per_s: f64,
    /// Speed (km/h)
    pub velocity_kmh: f64,
    /// Cumulative distance (m)
    pub distance_m: f64,
}

impl From<&RunSample> for TraceRecord {
    fn from(s: &RunSample) -> Self {
        Self {
            time_sec: s.time_sec,
            velocity_m_per_s: s.velocity_m_per_s,
            velocity_kmh: crate::units::m_per_s_to_kmh(s.velocity_m_per_s),
            distance_m: s.distance_m,
        }
    }
}

/// Timestamped file name under `dir`, creating the directory if needed
fn timestamped_path(dir: &Path, prefix: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    Ok(dir.join(format!("{}_{}.csv", prefix, timestamp)))
}

/// Write (time, velocity, distance) samples to `exports/stop_trace_*.csv`
///
/// Returns the path of the written file.
pub fn export_run_csv(run: &SimulationRun) -> Result<PathBuf> {
    let path = timestamped_path(Path::new("exports"), "stop_trace")?;
    write_run_csv(run, &path)?;
    Ok(path)
}

/// Write samples to a specific file
pub fn write_run_csv(run: &SimulationRun, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for sample in &run.samples {
        writer.serialize(TraceRecord::from(sample))?;
    }
    writer.flush()?;
    log::info!("Trace exported: {} ({} samples)", path.display(), run.len());
    Ok(())
}

/// Write energy-mode diagnostics to `exports/energy_steps_*.csv`
pub fn export_energy_csv(steps: &[EnergyStep]) -> Result<PathBuf> {
    let path = timestamped_path(Path::new("exports"), "energy_steps")?;
    write_energy_csv(steps, &path)?;
    Ok(path)
}

pub fn write_energy_csv(steps: &[EnergyStep], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for step in steps {
        writer.serialize(step)?;
    }
    writer.flush()?;
    log::info!("Energy diagnostics exported: {} ({} steps)", path.display(), steps.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_run_csv() {
        let mut run = SimulationRun::new();
        run.push(0.0, 5.0, 0.0);
        run.push(0.05, 4.85, 0.2425);

        let path = std::env::temp_dir().join(format!("bike_dynamics_trace_{}.csv", std::process::id()));
        write_run_csv(&run, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("time_sec,velocity_m_per_s,velocity_kmh,distance_m"));
        assert_eq!(lines.count(), 2);
        std::fs::remove_file(&path).ok();
    }
}
