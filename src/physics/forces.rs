//! Aggregate resistive force on the bicycle and rider.
//!
//! F_total = F_aero + F_roll + F_grade + F_brake
//!
//! Where:
//! - F_aero  = K_A · W_a            (W_a = signed wind factor, see `wind`)
//! - F_roll  = C_rr · mg
//! - F_grade = (grade% / 100) · mg
//! - F_brake = b · mg               (b = braking deceleration in g)
//!
//! The rear brake carries `rear_fraction` of the braking effort. Before the
//! forces are summed, that share is checked against the static friction the
//! rear tyre can develop under the braking weight transfer; exceeding it is a
//! skid and the evaluation is infeasible.

use serde::{Deserialize, Serialize};

use super::moments::normal_forces;
use super::wind::{head_wind_squared, WindState};
use super::{VehicleParams, G_ACCEL};
use crate::error::{DynamicsError, DynamicsResult};

/// Upper braking fraction accepted by the default front-only policy (g)
pub const MAX_FRONT_ONLY_BRAKE_G: f64 = 0.56;

/// Braking request for one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Braking {
    /// Deceleration demanded from the brakes, as a fraction of g
    pub g_fraction: f64,
    /// Share of the braking effort taken by the rear wheel, in [0, 1]
    pub rear_fraction: f64,
}

impl Braking {
    /// No braking at all
    pub fn none() -> Self {
        Self {
            g_fraction: 0.0,
            rear_fraction: 0.0,
        }
    }

    /// Braking split chosen by the default policy
    pub fn with_default_policy(g_fraction: f64) -> DynamicsResult<Self> {
        Ok(Self {
            g_fraction,
            rear_fraction: default_rear_fraction(g_fraction)?,
        })
    }

    /// Braking with an explicit rear-wheel share
    pub fn with_rear_fraction(g_fraction: f64, rear_fraction: f64) -> DynamicsResult<Self> {
        let braking = Self {
            g_fraction,
            rear_fraction,
        };
        braking.validate()?;
        Ok(braking)
    }

    pub fn validate(&self) -> DynamicsResult<()> {
        if !(0.0..=1.0).contains(&self.g_fraction) {
            return Err(DynamicsError::invalid(format!(
                "braking fraction must be in [0, 1] g, got {}",
                self.g_fraction
            )));
        }
        if !(0.0..=1.0).contains(&self.rear_fraction) {
            return Err(DynamicsError::invalid(format!(
                "rear brake fraction must be in [0, 1], got {}",
                self.rear_fraction
            )));
        }
        Ok(())
    }
}

impl Default for Braking {
    fn default() -> Self {
        Self::none()
    }
}

/// Rear share of braking under the default policy: front brake only
///
/// Valid for braking fractions in [0, 0.56] g.
pub fn default_rear_fraction(g_fraction: f64) -> DynamicsResult<f64> {
    if !(0.0..=MAX_FRONT_ONLY_BRAKE_G).contains(&g_fraction) {
        return Err(DynamicsError::invalid(format!(
            "braking fraction {} outside [0, {}] for front-only braking",
            g_fraction, MAX_FRONT_ONLY_BRAKE_G
        )));
    }
    Ok(0.0)
}

/// Resistive force components (N), recomputed on every evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResistiveForces {
    pub aerodynamic_N: f64,
    pub rolling_N: f64,
    pub grade_N: f64,
    /// Total braking force from both brakes
    pub braking_N: f64,
    /// Portion of `braking_N` applied at the rear wheel
    pub rear_braking_N: f64,
    /// Rear braking force the tyre can hold before skidding
    pub rear_braking_limit_N: f64,
    pub total_N: f64,
}

/// Evaluate every resistive force at `velocity_m_per_s`
///
/// The bicycle heads along 0°, so `wind.bearing_deg` is relative to the
/// direction of travel. Returns `Infeasible` when the rear brake would skid.
pub fn total_resistance(
    velocity_m_per_s: f64,
    wind: WindState,
    grade_percent: f64,
    braking: Braking,
    params: &VehicleParams,
) -> DynamicsResult<ResistiveForces> {
    if velocity_m_per_s == 0.0 {
        return Err(DynamicsError::invalid(
            "resistance is undefined at zero velocity (no direction of travel)",
        ));
    }
    braking.validate()?;

    let grade_fraction = grade_percent / 100.0;
    let weight_N = params.total_weight_N;

    let grade_N = grade_fraction * weight_N;
    let rolling_N = params.rolling_coefficient * weight_N;
    let aerodynamic_N = params.drag_factor
        * head_wind_squared(velocity_m_per_s, wind.speed_m_per_s, wind.bearing_deg, 0.0);

    // cos θ ≈ 1 − grade for small slopes
    let cos_theta = 1.0 - grade_fraction;
    let loads = normal_forces(
        params.wheel_base_m,
        params.rear_crank_distance_m,
        params.com_height_m,
        params.total_mass_kg * cos_theta,
        braking.g_fraction,
    );
    let rear_braking_limit_N = params.static_friction * loads.rear_N;
    let rear_braking_N = braking.g_fraction * G_ACCEL * braking.rear_fraction * params.total_mass_kg;

    if rear_braking_N > rear_braking_limit_N {
        return Err(DynamicsError::Infeasible {
            velocity_m_per_s,
            reason: format!(
                "rear brake force {:.1} N exceeds traction limit {:.1} N (rear load {:.1} N)",
                rear_braking_N, rear_braking_limit_N, loads.rear_N
            ),
        });
    }

    let braking_N = braking.g_fraction * weight_N;
    let total_N = aerodynamic_N + rolling_N + grade_N + braking_N;

    Ok(ResistiveForces {
        aerodynamic_N,
        rolling_N,
        grade_N,
        braking_N,
        rear_braking_N,
        rear_braking_limit_N,
        total_N,
    })
}
