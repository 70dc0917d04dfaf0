//! Per-run trace data produced by the stopping simulator.
//!
//! A run is append-only while the simulator steps and is handed back to the
//! caller only when tracing was requested.

use serde::{Deserialize, Serialize};

/// One integrator sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSample {
    /// Elapsed time (s)
    pub time_sec: f64,
    /// Speed at the end of the step (m/s)
    pub velocity_m_per_s: f64,
    /// Cumulative distance (m)
    pub distance_m: f64,
}

/// Energy-mode diagnostics for one velocity decrement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyStep {
    /// Speed at the start of the step (m/s)
    pub velocity_initial_m_per_s: f64,
    /// Speed at the end of the step (m/s)
    pub velocity_final_m_per_s: f64,
    /// Net energy dissipated by resistance (J)
    pub delta_energy_J: f64,
    /// Kinetic + rotational energy released (J)
    pub delta_kinetic_J: f64,
    /// Potential energy gained climbing (J), negative downhill
    pub delta_potential_J: f64,
    /// Total resistive force at the end speed (N)
    pub drag_N: f64,
    /// Distance covered (m)
    pub delta_distance_m: f64,
    /// Time taken (s)
    pub delta_time_sec: f64,
}

/// Sequence of (time, velocity, distance) samples for one stop
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationRun {
    pub samples: Vec<RunSample>,
    /// Only filled by the energy-integration mode
    pub energy_steps: Vec<EnergyStep>,
}

impl SimulationRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time_sec: f64, velocity_m_per_s: f64, distance_m: f64) {
        self.samples.push(RunSample {
            time_sec,
            velocity_m_per_s,
            distance_m,
        });
    }

    pub fn push_energy_step(&mut self, step: EnergyStep) {
        self.energy_steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&RunSample> {
        self.samples.last()
    }
}
