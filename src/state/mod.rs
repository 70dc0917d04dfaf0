//! Data recorded while a solver runs.

mod run;

pub use run::{EnergyStep, RunSample, SimulationRun};
