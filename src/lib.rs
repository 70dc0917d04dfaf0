//! Bike Dynamics - longitudinal bicycle-and-rider force model
//!
//! This library combines aerodynamic, rolling, grade and braking resistance
//! to solve two inverse problems: the cruising speed a given power sustains,
//! and the distance and time needed to brake to a stop without skidding the
//! rear wheel.

// Allow non-snake-case for unit suffixes in field names (N, J, etc.)
// This follows the project convention of including units in names.
#![allow(non_snake_case)]

pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod physics;
pub mod solver;
pub mod state;
pub mod units;

pub use config::{EnvironmentParameters, Parameters, SolverParameters, VehicleParameters};
pub use error::{DynamicsError, DynamicsResult};
pub use physics::{
    head_wind, head_wind_squared, max_rear_braking_fraction, normal_forces, total_resistance,
    Braking, NormalForces, ResistiveForces, VehicleParams, WindState, G_ACCEL,
};
pub use solver::{
    simulate_stop, solve_cruise_velocity, IntegrationMode, StopOutcome, StopQuantity, StopScenario,
    StoppingSimulator, VelocitySolver,
};
pub use state::SimulationRun;
