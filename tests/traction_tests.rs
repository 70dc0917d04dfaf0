//! Wheel load and braking traction tests.
//!
//! Reference geometry: wheel base 1.01 m, rear axle to crank 0.43 m,
//! center of mass 1.15 m above the ground, 80 kg rider + bicycle.

use bike_dynamics::{
    config::Parameters,
    physics::{
        moments::{critical_brake_fraction, max_front_brake_g, max_rear_brake_g, normal_forces_about},
        normal_forces, total_resistance, Braking, MomentPoint, VehicleParams, WindState, G_ACCEL,
    },
};

fn reference_params() -> VehicleParams {
    Parameters::default()
        .vehicle_params()
        .expect("default parameters are valid")
}

// ============================================================================
// Normal forces
// ============================================================================

#[test]
fn test_normal_forces_sum_to_weight() {
    let mg = 80.0 * G_ACCEL;
    for i in 0..=10 {
        let brake_g = i as f64 / 10.0;
        let loads = normal_forces(1.01, 0.43, 1.15, 80.0, brake_g);
        assert!(
            (loads.total_N() - mg).abs() < 1e-6,
            "at {} g loads sum to {} N, expected {} N",
            brake_g,
            loads.total_N(),
            mg
        );
    }
}

#[test]
fn test_braking_shifts_load_forward() {
    let still = normal_forces(1.01, 0.43, 1.15, 80.0, 0.0);
    let braking = normal_forces(1.01, 0.43, 1.15, 80.0, 0.3);
    assert!(braking.front_N > still.front_N);
    assert!(braking.rear_N < still.rear_N);
}

#[test]
fn test_rear_unloads_past_critical_fraction() {
    let loads = normal_forces(1.01, 0.43, 1.15, 80.0, 0.55);
    assert!(loads.rear_N < 0.0, "rear load {} N", loads.rear_N);
    assert!(!loads.is_valid());
}

#[test]
fn test_all_moment_points_give_same_loads() {
    for point in [MomentPoint::OverRearWheel, MomentPoint::CenterOfMass] {
        let reference = normal_forces(1.01, 0.43, 1.15, 80.0, 0.4);
        let loads = normal_forces_about(point, 1.01, 0.43, 1.15, 80.0, 0.4);
        assert!((loads.front_N - reference.front_N).abs() < 1e-6, "{:?}", point);
        assert!((loads.rear_N - reference.rear_N).abs() < 1e-6, "{:?}", point);
    }
}

// ============================================================================
// Critical braking fraction
// ============================================================================

#[test]
fn test_reference_critical_fraction() {
    let critical = critical_brake_fraction(&reference_params(), MomentPoint::OverFrontWheel, 0.01);
    assert!((critical - 0.50).abs() < 1e-9, "got {}", critical);
}

#[test]
fn test_critical_fraction_falls_with_com_height() {
    let mut params = reference_params();
    let mut previous = f64::INFINITY;
    for height in [0.6, 0.8, 1.0, 1.15, 1.3, 1.5] {
        params.com_height_m = height;
        let critical = critical_brake_fraction(&params, MomentPoint::OverFrontWheel, 0.01);
        assert!(
            critical <= previous,
            "critical fraction rose to {} at height {} m",
            critical,
            height
        );
        previous = critical;
    }
}

#[test]
fn test_single_brake_limits_are_ordered() {
    let params = reference_params();
    let rear = max_rear_brake_g(&params);
    let front = max_front_brake_g(&params).expect("front brake can skid with default geometry");
    assert!(rear < front, "rear {} g, front {} g", rear, front);
}

// ============================================================================
// Skid checks inside the force model
// ============================================================================

#[test]
fn test_even_split_at_moderate_braking_is_feasible() {
    let braking = Braking::with_rear_fraction(0.3, 0.5).unwrap();
    let forces = total_resistance(5.0, WindState::calm(), 0.0, braking, &reference_params());
    assert!(forces.is_ok(), "{:?}", forces);
}

#[test]
fn test_rear_only_hard_braking_skids() {
    let braking = Braking::with_rear_fraction(0.45, 1.0).unwrap();
    let result = total_resistance(5.0, WindState::calm(), 0.0, braking, &reference_params());
    assert!(result.unwrap_err().is_infeasible());
}
