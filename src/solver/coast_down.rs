//! Rolling-resistance estimation from a coast-down test.
//!
//! The rider stops pedalling at `initial_velocity` and times how long the
//! bicycle takes to slow to `final_velocity` against a constant head wind.
//! Candidate rolling coefficients are simulated with explicit Euler steps on
//!
//! m·dv/dt = −(K_A·(v + w)² + m·g·C_rr)
//!
//! and the first whose coast-down time lands within one second of the
//! measurement is taken.

use serde::{Deserialize, Serialize};

use crate::error::{DynamicsError, DynamicsResult};
use crate::physics::G_ACCEL;
use crate::units::kmh_to_m_per_s;

/// Coast-down time may differ from the measured duration by this much (s)
const MATCH_TOLERANCE_SEC: f64 = 1.0;

/// Coefficients tried: 0/1000, 1/1000, ..., 14/1000
const CANDIDATE_COUNT: usize = 15;
const CANDIDATE_SCALE: f64 = 1000.0;

/// Speed within this margin of the target ends the coast (m/s)
const ARRIVAL_MARGIN_M_PER_S: f64 = 0.1;

/// A measured coast-down run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoastDownTest {
    /// Rider + bicycle (kg)
    pub mass_kg: f64,
    /// K_A (kg/m)
    pub drag_factor: f64,
    pub initial_velocity_m_per_s: f64,
    pub final_velocity_m_per_s: f64,
    /// Constant head wind (m/s)
    pub head_wind_m_per_s: f64,
    /// Measured time from initial to final velocity (s)
    pub duration_sec: f64,
    /// Integration step (s)
    pub time_step_sec: f64,
}

impl CoastDownTest {
    pub fn validate(&self) -> DynamicsResult<()> {
        if self.mass_kg <= 0.0 || self.time_step_sec <= 0.0 || self.duration_sec <= 0.0 {
            return Err(DynamicsError::invalid(
                "mass, time step and duration must be > 0",
            ));
        }
        if self.final_velocity_m_per_s >= self.initial_velocity_m_per_s {
            return Err(DynamicsError::invalid(
                "final velocity must be below the initial velocity",
            ));
        }
        Ok(())
    }

    /// Simulated time (s) to coast down with rolling coefficient `c_r`, or
    /// `None` if the target speed is not reached within the measured duration
    pub fn coast_down_time(&self, c_r: f64) -> Option<f64> {
        let mut velocity = self.initial_velocity_m_per_s;
        let mut time = 0.0;

        while time < self.duration_sec {
            let apparent = velocity + self.head_wind_m_per_s;
            let drag_N = -(self.drag_factor * apparent * apparent + self.mass_kg * G_ACCEL * c_r);
            velocity += self.time_step_sec * drag_N / self.mass_kg;
            time += self.time_step_sec;

            if velocity - self.final_velocity_m_per_s < ARRIVAL_MARGIN_M_PER_S {
                return Some(time);
            }
        }
        None
    }

    /// First candidate rolling coefficient consistent with the measurement
    pub fn estimate_rolling_coefficient(&self) -> DynamicsResult<Option<f64>> {
        self.validate()?;

        for i in 0..CANDIDATE_COUNT {
            let c_r = i as f64 / CANDIDATE_SCALE;
            if let Some(time) = self.coast_down_time(c_r) {
                if (time - self.duration_sec).abs() < MATCH_TOLERANCE_SEC {
                    log::info!("Coast-down match: C_rr = {:.3} ({:.1} s)", c_r, time);
                    return Ok(Some(c_r));
                }
            }
        }
        log::warn!("No rolling coefficient matches a {:.1} s coast-down", self.duration_sec);
        Ok(None)
    }
}

impl Default for CoastDownTest {
    /// Commuter on an 85 kg system, 20 → 5 km/h in 20 s into a 5 km/h head wind
    fn default() -> Self {
        Self {
            mass_kg: 85.0,
            drag_factor: 0.3,
            initial_velocity_m_per_s: kmh_to_m_per_s(20.0),
            final_velocity_m_per_s: kmh_to_m_per_s(5.0),
            head_wind_m_per_s: kmh_to_m_per_s(5.0),
            duration_sec: 20.0,
            time_step_sec: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_estimate() {
        let test = CoastDownTest::default();
        let c_r = test.estimate_rolling_coefficient().unwrap();
        assert_eq!(c_r, Some(0.013));
    }

    #[test]
    fn test_more_rolling_resistance_stops_sooner() {
        let test = CoastDownTest::default();
        let slow = test.coast_down_time(0.013).unwrap();
        let fast = test.coast_down_time(0.014).unwrap();
        assert!(fast < slow);
        assert!(test.coast_down_time(0.0).is_none());
    }

    #[test]
    fn test_unmatched_measurement() {
        let test = CoastDownTest {
            duration_sec: 2.0,
            ..Default::default()
        };
        assert_eq!(test.estimate_rolling_coefficient().unwrap(), None);
    }

    #[test]
    fn test_invalid_velocities_rejected() {
        let test = CoastDownTest {
            final_velocity_m_per_s: 10.0,
            ..Default::default()
        };
        assert!(test.estimate_rolling_coefficient().is_err());
    }
}
