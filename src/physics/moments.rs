//! Static moment analysis and rear-wheel traction.
//!
//! Side view, front wheel on the left. Braking at `b` g transfers load from
//! the rear wheel to the front. Taking moments about the point above the
//! front contact patch at centre-of-mass height:
//!
//! N_r = [mg·(L − a) − b·mg·h] / L
//! N_f = mg − N_r
//!
//! Where:
//! - L = wheel base
//! - a = rear crank distance (rear load arm)
//! - h = centre-of-mass height
//!
//! Moments about the point above the rear wheel, or about the centre of mass,
//! give the same loads and are kept as cross-checks.
//!
//! Reference: Wilson & Papadopoulos, Bicycling Science, 3rd ed., ch. 7

use serde::{Deserialize, Serialize};

use super::{VehicleParams, G_ACCEL};
use crate::error::{DynamicsError, DynamicsResult};

/// Upper end of the critical braking scan (g)
const MAX_SCANNED_BRAKE_G: f64 = 1.0;

/// Vertical wheel loads (N)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalForces {
    pub front_N: f64,
    pub rear_N: f64,
}

impl NormalForces {
    pub fn total_N(&self) -> f64 {
        self.front_N + self.rear_N
    }

    /// Both wheels keep contact with the road
    pub fn is_valid(&self) -> bool {
        self.front_N >= 0.0 && self.rear_N >= 0.0
    }
}

/// Point the moments are taken about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MomentPoint {
    /// Above the front contact patch at centre-of-mass height
    #[default]
    OverFrontWheel,
    /// Above the rear contact patch at centre-of-mass height
    OverRearWheel,
    /// Static split plus an explicit weight-transfer term
    CenterOfMass,
}

/// Normal loads for a braking deceleration of `brake_g` (fraction of g)
pub fn normal_forces(
    wheel_base_m: f64,
    rear_crank_distance_m: f64,
    com_height_m: f64,
    mass_kg: f64,
    brake_g: f64,
) -> NormalForces {
    normal_forces_about(
        MomentPoint::OverFrontWheel,
        wheel_base_m,
        rear_crank_distance_m,
        com_height_m,
        mass_kg,
        brake_g,
    )
}

pub fn normal_forces_about(
    point: MomentPoint,
    wheel_base_m: f64,
    rear_crank_distance_m: f64,
    com_height_m: f64,
    mass_kg: f64,
    brake_g: f64,
) -> NormalForces {
    let mg = mass_kg * G_ACCEL;
    let braking_N = brake_g * mg;

    match point {
        MomentPoint::OverFrontWheel => {
            let anti_clockwise = mg * (wheel_base_m - rear_crank_distance_m);
            let clockwise = braking_N * com_height_m;
            let rear_N = (anti_clockwise - clockwise) / wheel_base_m;
            NormalForces {
                front_N: mg - rear_N,
                rear_N,
            }
        }
        MomentPoint::OverRearWheel => {
            let clockwise = mg * rear_crank_distance_m + braking_N * com_height_m;
            let front_N = clockwise / wheel_base_m;
            NormalForces {
                front_N,
                rear_N: mg - front_N,
            }
        }
        MomentPoint::CenterOfMass => {
            let transfer_N = (com_height_m / wheel_base_m) * braking_N;
            let static_rear = mg * (wheel_base_m - rear_crank_distance_m) / wheel_base_m;
            let static_front = mg * rear_crank_distance_m / wheel_base_m;
            NormalForces {
                front_N: static_front + transfer_N,
                rear_N: static_rear - transfer_N,
            }
        }
    }
}

/// Highest braking fraction (g) before the rear wheel unloads
///
/// Scans upward from 0 in steps of `scan_step` and returns the last fraction
/// with a non-negative rear load. Rear load falls monotonically with braking,
/// so the scan is a bounded boundary search over [0, 1] g.
pub fn max_rear_braking_fraction(params: &VehicleParams, scan_step: f64) -> f64 {
    critical_brake_fraction(params, MomentPoint::OverFrontWheel, scan_step)
}

pub fn critical_brake_fraction(params: &VehicleParams, point: MomentPoint, scan_step: f64) -> f64 {
    let steps = (MAX_SCANNED_BRAKE_G / scan_step).round() as usize;
    let mut last_feasible = 0.0;

    for i in 0..=steps {
        let brake_g = i as f64 * scan_step;
        let loads = normal_forces_about(
            point,
            params.wheel_base_m,
            params.rear_crank_distance_m,
            params.com_height_m,
            params.total_mass_kg,
            brake_g,
        );
        if loads.rear_N < 0.0 {
            log::debug!("Rear wheel unloads at {:.2} g ({:?})", brake_g, point);
            return last_feasible;
        }
        last_feasible = brake_g;
    }
    last_feasible
}

/// Maximum deceleration (g) from the rear brake alone before it skids
pub fn max_rear_brake_g(params: &VehicleParams) -> f64 {
    let mg = params.total_mass_kg * G_ACCEL;
    let anti_clockwise = mg * (params.wheel_base_m - params.rear_crank_distance_m);
    let rear_N = anti_clockwise / (params.wheel_base_m + params.static_friction * params.com_height_m);
    params.static_friction * rear_N / mg
}

/// Maximum deceleration (g) from the front brake alone before it skids
///
/// When μ·h reaches the wheel base the front tyre cannot skid at all; the
/// rider pitches over first and the limit is undefined.
pub fn max_front_brake_g(params: &VehicleParams) -> DynamicsResult<f64> {
    let denominator = params.wheel_base_m - params.static_friction * params.com_height_m;
    if denominator <= 0.0 {
        return Err(DynamicsError::invalid(format!(
            "front brake cannot skid: μ·h ({:.3} m) >= wheel base ({:.3} m)",
            params.static_friction * params.com_height_m,
            params.wheel_base_m
        )));
    }
    let mg = params.total_mass_kg * G_ACCEL;
    let front_N = mg * params.rear_crank_distance_m / denominator;
    Ok(params.static_friction * front_N / mg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Parameters;

    fn reference_params() -> VehicleParams {
        Parameters::default().vehicle_params().unwrap()
    }

    #[test]
    fn test_static_split() {
        let loads = normal_forces(1.01, 0.43, 1.15, 80.0, 0.0);
        let mg = 80.0 * G_ACCEL;
        assert!((loads.rear_N - mg * 0.58 / 1.01).abs() < 1e-9);
        assert!(loads.is_valid());
    }

    #[test]
    fn test_moment_points_agree() {
        for brake_g in [0.0, 0.25, 0.5, 0.75] {
            let a = normal_forces_about(MomentPoint::OverFrontWheel, 1.01, 0.43, 1.15, 80.0, brake_g);
            let b = normal_forces_about(MomentPoint::OverRearWheel, 1.01, 0.43, 1.15, 80.0, brake_g);
            let c = normal_forces_about(MomentPoint::CenterOfMass, 1.01, 0.43, 1.15, 80.0, brake_g);
            assert!((a.rear_N - b.rear_N).abs() < 1e-9);
            assert!((a.rear_N - c.rear_N).abs() < 1e-9);
        }
    }

    #[test]
    fn test_reference_critical_fraction() {
        // Rear unloads at 0.58 / 1.15 ≈ 0.504 g
        let critical = max_rear_braking_fraction(&reference_params(), 0.01);
        assert!((critical - 0.50).abs() < 1e-9, "got {}", critical);
    }

    #[test]
    fn test_scan_saturates_when_rear_never_lifts() {
        let mut params = reference_params();
        params.com_height_m = 0.3;
        assert!((max_rear_braking_fraction(&params, 0.01) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_brake_limits() {
        let params = reference_params();
        let rear = max_rear_brake_g(&params);
        assert!(rear > 0.0 && rear < params.static_friction);

        let front = max_front_brake_g(&params).unwrap();
        assert!(front > rear);

        let mut slick = params.clone();
        slick.static_friction = 1.0;
        assert!(max_front_brake_g(&slick).is_err());
    }
}
