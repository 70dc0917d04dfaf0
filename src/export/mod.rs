//! Export functionality for simulation data.
//!
//! Provides CSV trace export and JSON stop reports.

mod csv_export;
mod json_export;

pub use csv_export::{
    export_energy_csv, export_run_csv, write_energy_csv, write_run_csv, TraceRecord,
};
pub use json_export::{export_stop_json, export_stop_json_to, StopReport};
