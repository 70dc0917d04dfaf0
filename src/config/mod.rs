//! Configuration module for loading rider, bicycle and solver parameters.
//!
//! Each group lives in its own JSON file and falls back to defaults.

mod parameters;

pub use parameters::{
    DensityModel, EnvironmentParameters, Parameters, SolverParameters, VehicleParameters,
};
