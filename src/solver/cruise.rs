//! Steady-state cruising velocity from sustained power.
//!
//! At steady state the power delivered at the wheel balances the resistive
//! power:
//!
//! v · (K_A·W_a(v) + R) = η·P
//!
//! Solved by Newton-Raphson on
//!
//! f(v)  = v · (K·|W_a(v)| + R) − η·P
//! f'(v) ≈ K · (3v + w) · h(v) + R
//!
//! Where:
//! - W_a = signed wind factor, h = signed head wind, w = wind speed
//! - R   = all speed-independent resistance (rolling + grade)
//! - K   = K_A, negated for any iteration whose wind factor is negative
//!
//! The iteration starts far above any realistic speed so it approaches the
//! physical root from above.

use crate::config::SolverParameters;
use crate::error::{DynamicsError, DynamicsResult};
use crate::physics::wind::{head_wind, head_wind_squared, WindState};

/// Newton-Raphson solver for cruising speed
#[derive(Debug, Clone, Default)]
pub struct VelocitySolver {
    pub config: SolverParameters,
}

impl VelocitySolver {
    pub fn new(config: SolverParameters) -> Self {
        Self { config }
    }

    /// Cruising speed (m/s) starting from the configured initial guess
    pub fn solve(
        &self,
        drag_factor: f64,
        wind: WindState,
        other_resistance_N: f64,
        power_W: f64,
    ) -> DynamicsResult<f64> {
        self.solve_from(
            self.config.initial_guess_m_per_s,
            drag_factor,
            wind,
            other_resistance_N,
            power_W,
        )
    }

    /// Cruising speed (m/s) starting from `initial_guess_m_per_s`
    pub fn solve_from(
        &self,
        initial_guess_m_per_s: f64,
        drag_factor: f64,
        wind: WindState,
        other_resistance_N: f64,
        power_W: f64,
    ) -> DynamicsResult<f64> {
        self.config.validate()?;
        if power_W < 0.0 {
            return Err(DynamicsError::invalid(format!("power must be >= 0, got {} W", power_W)));
        }

        let (tolerance, max_iterations) = self.config.newton_limits(wind.speed_m_per_s);
        let target_W = self.config.efficiency * power_W;
        let mut velocity = initial_guess_m_per_s;

        for iteration in 1..=max_iterations {
            if velocity == 0.0 || !velocity.is_finite() {
                return Err(DynamicsError::Diverged {
                    iterations: iteration,
                    last_value: velocity,
                });
            }

            let head = head_wind(velocity, wind.speed_m_per_s, wind.bearing_deg, 0.0);
            let wind_factor = head_wind_squared(velocity, wind.speed_m_per_s, wind.bearing_deg, 0.0);
            // Tail-wind dominated: flip the coefficient for this iteration only
            let k = if wind_factor < 0.0 { -drag_factor } else { drag_factor };

            let f = velocity * (k * wind_factor.abs() + other_resistance_N) - target_W;
            let f_prime = k * (3.0 * velocity + wind.speed_m_per_s) * head + other_resistance_N;
            if f_prime == 0.0 || !f_prime.is_finite() {
                return Err(DynamicsError::Diverged {
                    iterations: iteration,
                    last_value: velocity,
                });
            }

            let next = velocity - f / f_prime;
            if (next - velocity).abs() < tolerance {
                log::debug!(
                    "Cruise velocity {:.3} m/s after {} iterations ({} W)",
                    next,
                    iteration,
                    power_W
                );
                return Ok(next);
            }
            velocity = next;
        }

        log::warn!(
            "Velocity solver did not converge in {} iterations (last {:.3} m/s)",
            max_iterations,
            velocity
        );
        Err(DynamicsError::Diverged {
            iterations: max_iterations,
            last_value: velocity,
        })
    }
}

/// Cruising speed (m/s) with default solver settings
pub fn solve_cruise_velocity(
    drag_factor: f64,
    wind: WindState,
    other_resistance_N: f64,
    power_W: f64,
) -> DynamicsResult<f64> {
    VelocitySolver::default().solve(drag_factor, wind, other_resistance_N, power_W)
}

/// Rider power (W) needed to hold `velocity_m_per_s`; the forward problem
/// the velocity solver inverts
pub fn required_power(
    drag_factor: f64,
    velocity_m_per_s: f64,
    wind: WindState,
    other_resistance_N: f64,
    efficiency: f64,
) -> DynamicsResult<f64> {
    if !(efficiency > 0.0 && efficiency <= 1.0) {
        return Err(DynamicsError::invalid(format!(
            "efficiency must be in (0, 1], got {}",
            efficiency
        )));
    }
    if velocity_m_per_s <= 0.0 {
        return Err(DynamicsError::invalid("velocity must be > 0"));
    }
    let aero_N = drag_factor
        * head_wind_squared(velocity_m_per_s, wind.speed_m_per_s, wind.bearing_deg, 0.0);
    Ok(velocity_m_per_s * (aero_N + other_resistance_N) / efficiency)
}
