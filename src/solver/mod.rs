//! Inverse problems over the force model.
//!
//! - Cruise: steady-state speed sustained by a given power (Newton-Raphson)
//! - Stopping: braking distance/time by force or energy integration
//! - Coast-down: rolling coefficient from a timed coast
//!
//! Every solver owns its accumulators for the duration of one call, so
//! independent runs can execute in parallel without synchronization.

pub mod coast_down;
pub mod cruise;
pub mod stopping;

pub use coast_down::CoastDownTest;
pub use cruise::{required_power, solve_cruise_velocity, VelocitySolver};
pub use stopping::{
    aashto_distance, bicycling_science_distance, simulate_stop, IntegrationMode, StopOutcome,
    StopQuantity, StopScenario, StoppingSimulator,
};
