//! Apparent wind decomposition tests.
//!
//! The bicycle heads along 0° throughout unless stated; wind bearings give
//! the direction the wind blows from.

use bike_dynamics::physics::wind::{
    apparent_wind, bearing_to_degrees, head_wind, head_wind_squared, BikeState, WindKind, WindState,
};

// ============================================================================
// Head wind
// ============================================================================

#[test]
fn test_head_wind_adds_to_bike_speed() {
    for (bike, wind) in [(3.0, 2.0), (6.0, 8.0), (10.0, 0.5)] {
        let value = head_wind(bike, wind, 0.0, 0.0);
        assert!(
            (value - (bike + wind)).abs() < 1e-9,
            "bike {} + wind {} should give {}, got {}",
            bike,
            wind,
            bike + wind,
            value
        );
    }
}

#[test]
fn test_calm_air_head_wind_is_bike_speed() {
    let value = head_wind(7.5, 0.0, 0.0, 0.0);
    assert!((value - 7.5).abs() < 1e-9, "got {}", value);

    let factor = head_wind_squared(7.5, 0.0, 0.0, 0.0);
    assert!((factor - 56.25).abs() < 1e-9, "got {}", factor);
}

#[test]
fn test_slow_tail_wind_still_opposes_travel() {
    // Rider outruns the wind, so the apparent wind still comes from ahead
    let value = head_wind(6.0, 2.0, 180.0, 0.0);
    assert!((value - 4.0).abs() < 1e-9, "got {}", value);
}

#[test]
fn test_fast_tail_wind_pushes() {
    let value = head_wind(6.0, 8.0, 180.0, 0.0);
    assert!((value + 2.0).abs() < 1e-9, "got {}", value);
    assert!(head_wind_squared(6.0, 8.0, 180.0, 0.0) < 0.0);
}

#[test]
fn test_head_wind_is_independent_of_absolute_heading() {
    // Rotating bicycle and wind together leaves the apparent wind unchanged
    let reference = head_wind(6.0, 4.0, 30.0, 0.0);
    for rotation in [45.0, 90.0, 200.0] {
        let rotated = head_wind(6.0, 4.0, 30.0 + rotation, rotation);
        assert!(
            (rotated - reference).abs() < 0.5,
            "rotation {}°: {} vs {}",
            rotation,
            rotated,
            reference
        );
    }
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn test_classification() {
    let head = apparent_wind(WindState::new(3.0, 0.0), BikeState::new(5.0, 0.0));
    assert_eq!(head.kind, WindKind::Head);
    assert_eq!(head.angle_deg, 180.0);

    let tail = apparent_wind(WindState::new(9.0, 180.0), BikeState::new(5.0, 0.0));
    assert_eq!(tail.kind, WindKind::Tail);
    assert_eq!(tail.angle_deg, 0.0);

    let cross = apparent_wind(WindState::new(50f64.sqrt(), 225.0), BikeState::new(5.0, 0.0));
    assert_eq!(cross.kind, WindKind::Cross);
}

#[test]
fn test_apparent_vector_is_wind_minus_bike() {
    let apparent = apparent_wind(WindState::new(4.0, 0.0), BikeState::new(6.0, 0.0));
    // Both blow towards 180°, i.e. along -x in plane coordinates
    assert!((apparent.vector.x + 10.0).abs() < 1e-9);
    assert!(apparent.vector.y.abs() < 1e-9);
}

#[test]
fn test_bearing_conversion() {
    assert_eq!(bearing_to_degrees(0.0), 90.0);
    assert_eq!(bearing_to_degrees(180.0), 270.0);
    assert_eq!(bearing_to_degrees(270.0), 180.0);
}
