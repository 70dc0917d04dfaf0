//! Longitudinal force model for a bicycle and rider.
//!
//! This module implements:
//! - Apparent wind decomposition into head/tail/cross components
//! - Aerodynamic, rolling, grade and braking resistance
//! - Static moment analysis of wheel loads under braking
//! - Air density for the aerodynamic drag factor
//!
//! References:
//! - Wilson & Papadopoulos, Bicycling Science, 3rd ed., MIT Press 2004
//! - Martin et al., J Appl Biomech 1998 (cycling power model)

pub mod atmosphere;
pub mod forces;
pub mod moments;
pub mod wind;

pub use forces::{default_rear_fraction, total_resistance, Braking, ResistiveForces};
pub use moments::{max_rear_braking_fraction, normal_forces, MomentPoint, NormalForces};
pub use wind::{head_wind, head_wind_squared, ApparentWind, BikeState, WindKind, WindState};

use serde::{Deserialize, Serialize};

/// Gravitational acceleration (m/s²)
pub const G_ACCEL: f64 = 9.81;

/// Vehicle value object consumed by every force evaluation
///
/// Built from `config::VehicleParameters` once the air density is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleParams {
    /// Rider + bicycle (kg)
    pub total_mass_kg: f64,
    /// Rider + bicycle weight (N)
    pub total_weight_N: f64,
    pub wheel_radius_m: f64,
    pub wheel_circumference_m: f64,
    /// Wheel mass × radius² (kg·m²)
    pub wheel_inertia_kg_m2: f64,
    pub wheel_base_m: f64,
    pub rear_crank_distance_m: f64,
    pub com_height_m: f64,
    pub rolling_coefficient: f64,
    /// K_A = ½·CdA·ρ (kg/m)
    pub drag_factor: f64,
    pub static_friction: f64,
}

impl VehicleParams {
    /// Translational plus wheel rotational kinetic energy released slowing
    /// from `v_initial` to `v_final` (J)
    pub fn delta_kinetic_energy_J(&self, v_initial: f64, v_final: f64) -> f64 {
        let translational = 0.5 * self.total_mass_kg * (v_initial * v_initial - v_final * v_final);
        let omega_initial = v_initial / self.wheel_radius_m;
        let omega_final = v_final / self.wheel_radius_m;
        let rotational = 0.5
            * self.wheel_inertia_kg_m2
            * (omega_initial * omega_initial - omega_final * omega_final);
        translational + rotational
    }
}
