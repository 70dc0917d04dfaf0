//! Apparent wind decomposition.
//!
//! The wind is given by the bearing it blows *from*; the bicycle by the
//! bearing it travels *to*. Both are flipped before summing so the apparent
//! wind points the way the air pushes on the rider:
//!
//! v_app = flip(v_wind) + flip(v_bike)
//!
//! The apparent vector is then projected onto the direction of travel and
//! classified by the angle it makes with the bicycle heading:
//! |angle| < 90° tail wind, = 90° cross wind, > 90° head wind.
//!
//! Angles in the public API are degrees. A bicycle speed of zero has no
//! heading to project onto; the projections return NaN and callers must guard.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Wind for a single evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindState {
    /// Wind speed (m/s), >= 0
    pub speed_m_per_s: f64,
    /// Direction the wind blows from (degrees)
    pub bearing_deg: f64,
}

impl WindState {
    pub fn new(speed_m_per_s: f64, bearing_deg: f64) -> Self {
        Self {
            speed_m_per_s,
            bearing_deg,
        }
    }

    pub fn calm() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Default for WindState {
    fn default() -> Self {
        Self::calm()
    }
}

/// Bicycle velocity for a single evaluation
///
/// The speed may go negative while a solver overshoots; physically it is >= 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BikeState {
    pub speed_m_per_s: f64,
    /// Direction of travel (degrees)
    pub heading_deg: f64,
}

impl BikeState {
    pub fn new(speed_m_per_s: f64, heading_deg: f64) -> Self {
        Self {
            speed_m_per_s,
            heading_deg,
        }
    }
}

/// Classification of the apparent wind relative to the direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindKind {
    Head,
    Tail,
    Cross,
}

impl WindKind {
    /// +1 opposes travel, -1 aids it, 0 is perpendicular
    pub fn sign(self) -> f64 {
        match self {
            WindKind::Head => 1.0,
            WindKind::Tail => -1.0,
            WindKind::Cross => 0.0,
        }
    }

    fn from_angle(angle_deg: f64) -> Self {
        if angle_deg < 90.0 {
            WindKind::Tail
        } else if angle_deg == 90.0 {
            WindKind::Cross
        } else {
            WindKind::Head
        }
    }
}

/// Apparent wind seen by the rider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApparentWind {
    /// Apparent wind vector (m/s)
    pub vector: DVec2,
    /// Bicycle velocity vector (m/s)
    pub bike: DVec2,
    /// Unsigned angle between bicycle heading and apparent wind, whole degrees
    pub angle_deg: f64,
    pub kind: WindKind,
}

impl ApparentWind {
    /// |projection of the apparent wind onto the direction of travel|
    fn projection(&self) -> f64 {
        (self.vector.dot(self.bike) / self.bike.length()).abs()
    }
}

/// Convert a clockwise compass bearing (0 = N) to a counter-clockwise plane
/// angle (0 = E). The mapping is its own inverse.
pub fn bearing_to_degrees(bearing: f64) -> f64 {
    (450.0 - bearing).rem_euclid(360.0)
}

/// Convert a plane angle back to a compass bearing
pub fn degrees_to_bearing(degrees: f64) -> f64 {
    bearing_to_degrees(degrees)
}

/// The direction opposite to `angle_deg`, in [0, 360)
pub fn flip_direction(angle_deg: f64) -> f64 {
    (angle_deg + 180.0).rem_euclid(360.0)
}

fn polar(magnitude: f64, angle_deg: f64) -> DVec2 {
    let radians = angle_deg.to_radians();
    DVec2::new(magnitude * radians.cos(), magnitude * radians.sin())
}

/// Signed angle from `from` to `to` in whole degrees, normalised to [-180, 180)
fn signed_angle_deg(from: DVec2, to: DVec2) -> f64 {
    let delta = (to.y.atan2(to.x) - from.y.atan2(from.x)).to_degrees();
    ((delta + 180.0).rem_euclid(360.0) - 180.0).round()
}

pub fn apparent_wind(wind: WindState, bike: BikeState) -> ApparentWind {
    let wind_vector = polar(wind.speed_m_per_s, flip_direction(wind.bearing_deg));
    let bike_vector = polar(bike.speed_m_per_s, bike.heading_deg);
    let minus_bike = polar(bike.speed_m_per_s, flip_direction(bike.heading_deg));

    let vector = wind_vector + minus_bike;
    let angle_deg = signed_angle_deg(bike_vector, vector).abs();

    ApparentWind {
        vector,
        bike: bike_vector,
        angle_deg,
        kind: WindKind::from_angle(angle_deg),
    }
}

/// Signed head wind along the direction of travel (m/s)
///
/// Positive opposes travel. For a bicycle heading 0° into wind from 0°,
/// this is bike speed + wind speed.
pub fn head_wind(bike_mag: f64, wind_mag: f64, wind_deg: f64, bike_deg: f64) -> f64 {
    let apparent = apparent_wind(
        WindState::new(wind_mag, wind_deg),
        BikeState::new(bike_mag, bike_deg),
    );
    apparent.projection() * apparent.kind.sign()
}

/// Signed wind factor W_a (m²/s²) fed directly into aerodynamic drag
///
/// The squared projection is scaled by the cosine of the apparent angle to
/// account for the non-collinear component.
pub fn head_wind_squared(bike_mag: f64, wind_mag: f64, wind_deg: f64, bike_deg: f64) -> f64 {
    let apparent = apparent_wind(
        WindState::new(wind_mag, wind_deg),
        BikeState::new(bike_mag, bike_deg),
    );
    let projection = apparent.projection();
    let squared = (projection * projection * apparent.angle_deg.to_radians().cos()).abs();
    squared * apparent.kind.sign()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 0.5;

    #[test]
    fn test_bearing_conversion_is_self_inverse() {
        for bearing in [0.0, 45.0, 90.0, 180.0, 270.0, 359.0] {
            let degrees = bearing_to_degrees(bearing);
            assert!((degrees_to_bearing(degrees) - bearing).abs() < 1e-9);
        }
        assert_eq!(bearing_to_degrees(0.0), 90.0);
        assert_eq!(bearing_to_degrees(90.0), 0.0);
    }

    #[test]
    fn test_flip_direction() {
        assert_eq!(flip_direction(0.0), 180.0);
        assert_eq!(flip_direction(270.0), 90.0);
        assert_eq!(flip_direction(-90.0), 90.0);
    }

    #[test]
    fn test_reference_head_winds() {
        let cases = [
            (0.0, 0.0, 14.0),
            (180.0, 0.0, -2.0),
            (220.0, 170.0, 11.14),
            (10.0, 190.0, -1.94),
        ];
        for (wind_deg, bike_deg, expected) in cases {
            let value = head_wind(6.0, 8.0, wind_deg, bike_deg);
            assert!(
                (value - expected).abs() <= TOLERANCE,
                "wind {}°, bike {}°: expected {}, got {}",
                wind_deg,
                bike_deg,
                expected,
                value
            );
        }
    }

    #[test]
    fn test_cross_wind_has_no_head_component() {
        // Wind exactly cancels the bicycle's forward motion, leaving a pure side wind
        let apparent = apparent_wind(WindState::new(50f64.sqrt(), 225.0), BikeState::new(5.0, 0.0));
        assert_eq!(apparent.kind, WindKind::Cross);
        assert_eq!(head_wind(5.0, 50f64.sqrt(), 225.0, 0.0), 0.0);
        assert_eq!(head_wind_squared(5.0, 50f64.sqrt(), 225.0, 0.0), 0.0);
    }

    #[test]
    fn test_wind_factor_sign_follows_classification() {
        assert!(head_wind_squared(5.0, 3.0, 0.0, 0.0) > 0.0);
        // Tail wind faster than the bicycle pushes the rider
        assert!(head_wind_squared(5.0, 8.0, 180.0, 0.0) < 0.0);
    }
}
