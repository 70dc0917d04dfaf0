//! Braking distance and time.
//!
//! Two interchangeable integrators share the force model:
//!
//! **Force integration** (fixed Δt):
//! 1. F = total resistance at v
//! 2. v ← max(v − (F/m)·Δt, 0)
//! 3. s ← s + v·Δt (updated velocity)
//!
//! **Energy integration** (fixed Δv):
//! 1. v_f = v_i − Δv, v_a = (v_i + v_f)/2
//! 2. ΔE = ΔKE_rot+trans(v_i → v_f) − m·g·grade·v_a·Δt_prev
//! 3. Δs = ΔE / F(v_f), Δt = Δs / v_a
//!
//! The potential-energy term uses the time of the previous step, seeded from
//! the energy released over the first decrement at the starting speed.
//!
//! Both loops stop once the speed reaches the configured floor. A skid, or a
//! net resistance that turns negative, ends the run as infeasible; running
//! out of steps is reported as divergence.

use serde::{Deserialize, Serialize};

use crate::config::SolverParameters;
use crate::error::{DynamicsError, DynamicsResult};
use crate::physics::forces::{total_resistance, Braking};
use crate::physics::wind::WindState;
use crate::physics::{VehicleParams, G_ACCEL};
use crate::state::{EnergyStep, SimulationRun};
use crate::units::nice;

/// Numerical strategy for the stopping simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegrationMode {
    /// Fixed time step, explicit Euler on the force balance
    #[default]
    Force,
    /// Fixed velocity decrement on the energy balance
    Energy,
}

/// Which accumulator the caller wants back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopQuantity {
    Distance,
    Time,
}

/// Inputs for one stop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopScenario {
    pub initial_velocity_m_per_s: f64,
    pub wind: WindState,
    pub grade_percent: f64,
    pub braking: Braking,
}

/// Result of a completed stop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopOutcome {
    pub mode: IntegrationMode,
    pub distance_m: f64,
    pub time_sec: f64,
    pub steps: usize,
    /// Full trace, present only when requested
    pub run: Option<SimulationRun>,
}

impl StopOutcome {
    pub fn quantity(&self, quantity: StopQuantity) -> f64 {
        match quantity {
            StopQuantity::Distance => self.distance_m,
            StopQuantity::Time => self.time_sec,
        }
    }
}

/// Time-stepped stopping simulator
#[derive(Debug, Clone)]
pub struct StoppingSimulator {
    pub params: VehicleParams,
    pub config: SolverParameters,
    /// Keep the per-step trace in the outcome
    pub trace: bool,
}

impl StoppingSimulator {
    pub fn new(params: VehicleParams, config: SolverParameters) -> Self {
        Self {
            params,
            config,
            trace: false,
        }
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn simulate(&self, scenario: &StopScenario, mode: IntegrationMode) -> DynamicsResult<StopOutcome> {
        self.config.validate()?;
        scenario.braking.validate()?;
        if scenario.initial_velocity_m_per_s < 0.0 {
            return Err(DynamicsError::invalid("initial velocity must be >= 0"));
        }

        let outcome = match mode {
            IntegrationMode::Force => self.integrate_forces(scenario),
            IntegrationMode::Energy => self.integrate_energy(scenario),
        };

        match &outcome {
            Ok(done) => log::debug!(
                "{:?} stop: {:.2} m in {:.2} s over {} steps",
                mode,
                done.distance_m,
                done.time_sec,
                done.steps
            ),
            Err(e) => log::warn!("{:?} stop failed: {}", mode, e),
        }
        outcome
    }

    /// Net resistance at `velocity`; negative resistance is infeasible
    fn resistance_N(&self, velocity: f64, scenario: &StopScenario) -> DynamicsResult<f64> {
        let forces = total_resistance(
            velocity,
            scenario.wind,
            scenario.grade_percent,
            scenario.braking,
            &self.params,
        )?;
        if forces.total_N < 0.0 {
            return Err(DynamicsError::Infeasible {
                velocity_m_per_s: velocity,
                reason: format!("net resistance {:.1} N is negative", forces.total_N),
            });
        }
        Ok(forces.total_N)
    }

    fn integrate_forces(&self, scenario: &StopScenario) -> DynamicsResult<StopOutcome> {
        let dt = self.config.stop_time_step_sec;
        let floor = self.config.stop_velocity_floor_m_per_s;
        let mass = self.params.total_mass_kg;

        let mut velocity = scenario.initial_velocity_m_per_s;
        let mut distance = 0.0;
        let mut time = 0.0;
        let mut steps = 0;
        let mut run = self.trace.then(SimulationRun::new);
        if let Some(run) = run.as_mut() {
            run.push(time, velocity, distance);
        }

        while velocity > floor {
            if steps >= self.config.max_stop_steps {
                return Err(DynamicsError::Diverged {
                    iterations: steps,
                    last_value: velocity,
                });
            }

            let resistance = self.resistance_N(velocity, scenario)?;
            let acceleration = -resistance / mass;
            velocity = (velocity + acceleration * dt).max(0.0);
            distance += velocity * dt;
            time += dt;
            steps += 1;

            if let Some(run) = run.as_mut() {
                run.push(time, velocity, distance);
            }
        }

        Ok(StopOutcome {
            mode: IntegrationMode::Force,
            distance_m: distance,
            time_sec: time,
            steps,
            run,
        })
    }

    fn integrate_energy(&self, scenario: &StopScenario) -> DynamicsResult<StopOutcome> {
        let dv = self.config.stop_velocity_decrement_m_per_s;
        let floor = self.config.stop_velocity_floor_m_per_s;
        let grade_fraction = scenario.grade_percent / 100.0;
        let mass = self.params.total_mass_kg;

        let mut v_i = scenario.initial_velocity_m_per_s;
        let mut distance = 0.0;
        let mut time = 0.0;
        let mut steps = 0;
        let mut run = self.trace.then(SimulationRun::new);
        if let Some(run) = run.as_mut() {
            run.push(time, v_i, distance);
        }

        if v_i <= floor {
            return Ok(StopOutcome {
                mode: IntegrationMode::Energy,
                distance_m: 0.0,
                time_sec: 0.0,
                steps: 0,
                run,
            });
        }

        let seed_drag = self.positive_resistance_N(v_i, scenario)?;
        let mut delta_s = self.params.delta_kinetic_energy_J(v_i, v_i - dv) / seed_drag;

        while v_i > floor {
            if steps >= self.config.max_stop_steps {
                return Err(DynamicsError::Diverged {
                    iterations: steps,
                    last_value: v_i,
                });
            }

            let v_f = (v_i - dv).max(0.0);
            if v_f == 0.0 {
                break;
            }
            let v_a = 0.5 * (v_i + v_f);
            let previous_dt = delta_s / v_a;

            let drag_N = self.positive_resistance_N(v_f, scenario)?;
            let delta_kinetic_J = self.params.delta_kinetic_energy_J(v_i, v_f);
            // Positive uphill, negative downhill
            let delta_potential_J = mass * G_ACCEL * grade_fraction * v_a * previous_dt;
            let delta_energy_J = delta_kinetic_J - delta_potential_J;

            delta_s = delta_energy_J / drag_N;
            let delta_t = delta_s / v_a;
            distance += delta_s;
            time += delta_t;
            steps += 1;

            log::trace!(
                "TE: {} KE: {} PE: {} Drag: {} DS: {} DT: {}",
                nice(delta_energy_J),
                nice(delta_kinetic_J),
                nice(delta_potential_J),
                nice(drag_N),
                nice(delta_s),
                nice(delta_t)
            );
            if let Some(run) = run.as_mut() {
                run.push(time, v_f, distance);
                run.push_energy_step(EnergyStep {
                    velocity_initial_m_per_s: v_i,
                    velocity_final_m_per_s: v_f,
                    delta_energy_J,
                    delta_kinetic_J,
                    delta_potential_J,
                    drag_N,
                    delta_distance_m: delta_s,
                    delta_time_sec: delta_t,
                });
            }

            v_i = v_f;
        }

        Ok(StopOutcome {
            mode: IntegrationMode::Energy,
            distance_m: distance,
            time_sec: time,
            steps,
            run,
        })
    }

    /// Resistance used as a divisor: zero means the bicycle never slows
    fn positive_resistance_N(&self, velocity: f64, scenario: &StopScenario) -> DynamicsResult<f64> {
        let drag = self.resistance_N(velocity, scenario)?;
        if drag == 0.0 {
            return Err(DynamicsError::Diverged {
                iterations: 0,
                last_value: velocity,
            });
        }
        Ok(drag)
    }
}

/// Stopping distance or time for one scenario
pub fn simulate_stop(
    scenario: &StopScenario,
    params: &VehicleParams,
    mode: IntegrationMode,
    quantity: StopQuantity,
) -> DynamicsResult<f64> {
    StoppingSimulator::new(params.clone(), SolverParameters::default())
        .simulate(scenario, mode)
        .map(|outcome| outcome.quantity(quantity))
}

/// Closed-form stopping distance (m) from Bicycling Science:
/// s = v² / (20·(c_a + c_r)), v in m/s
pub fn bicycling_science_distance(
    velocity_m_per_s: f64,
    adhesion_coefficient: f64,
    rolling_coefficient: f64,
) -> f64 {
    velocity_m_per_s * velocity_m_per_s / (20.0 * (adhesion_coefficient + rolling_coefficient))
}

/// AASHTO stopping sight distance (m):
/// s = 0.278·t·v + v² / (254·(f + G)), v in km/h, G as a fraction
pub fn aashto_distance(
    reaction_time_sec: f64,
    velocity_kmh: f64,
    grade_percent: f64,
    friction: f64,
) -> DynamicsResult<f64> {
    let grade = grade_percent / 100.0;
    if friction + grade <= 0.0 {
        return Err(DynamicsError::invalid(format!(
            "friction + grade must be > 0, got {}",
            friction + grade
        )));
    }
    Ok(0.278 * reaction_time_sec * velocity_kmh + velocity_kmh * velocity_kmh / (254.0 * (friction + grade)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Parameters;

    fn simulator() -> StoppingSimulator {
        let params = Parameters::default();
        StoppingSimulator::new(params.vehicle_params().unwrap(), params.solver)
    }

    fn scenario(velocity: f64, braking: Braking) -> StopScenario {
        StopScenario {
            initial_velocity_m_per_s: velocity,
            wind: WindState::calm(),
            grade_percent: 0.0,
            braking,
        }
    }

    #[test]
    fn test_already_below_floor() {
        let sim = simulator();
        for mode in [IntegrationMode::Force, IntegrationMode::Energy] {
            let outcome = sim.simulate(&scenario(0.5, Braking::none()), mode).unwrap();
            assert_eq!(outcome.distance_m, 0.0);
            assert_eq!(outcome.steps, 0);
        }
    }

    #[test]
    fn test_trace_matches_totals() {
        let sim = simulator().with_trace(true);
        let braking = Braking::with_default_policy(0.3).unwrap();
        let outcome = sim.simulate(&scenario(5.5, braking), IntegrationMode::Force).unwrap();
        let run = outcome.run.as_ref().unwrap();
        assert_eq!(run.len(), outcome.steps + 1);
        let last = run.last().unwrap();
        assert!((last.distance_m - outcome.distance_m).abs() < 1e-12);
        assert!(last.velocity_m_per_s <= 1.0);
    }

    #[test]
    fn test_energy_trace_records_every_step() {
        let sim = simulator().with_trace(true);
        let braking = Braking::with_default_policy(0.3).unwrap();
        let outcome = sim.simulate(&scenario(5.5, braking), IntegrationMode::Energy).unwrap();
        let run = outcome.run.unwrap();
        assert_eq!(run.energy_steps.len(), outcome.steps);
        assert!(run.energy_steps.iter().all(|s| s.delta_distance_m > 0.0));
    }

    #[test]
    fn test_step_cap_reports_divergence() {
        let params = Parameters::default();
        let vehicle = params.vehicle_params().unwrap();
        let config = SolverParameters {
            max_stop_steps: 5,
            ..params.solver
        };
        let sim = StoppingSimulator::new(vehicle, config);
        let result = sim.simulate(&scenario(5.5, Braking::none()), IntegrationMode::Force);
        assert!(result.unwrap_err().is_diverged());
    }

    #[test]
    fn test_steep_descent_without_brakes_is_infeasible() {
        let sim = simulator();
        let descent = StopScenario {
            grade_percent: -5.0,
            ..scenario(5.5, Braking::none())
        };
        for mode in [IntegrationMode::Force, IntegrationMode::Energy] {
            assert!(sim.simulate(&descent, mode).unwrap_err().is_infeasible());
        }
    }

    #[test]
    fn test_reference_formulas() {
        // 10 m/s on dry road, c_a 0.7, c_r 0.005
        let distance = bicycling_science_distance(10.0, 0.7, 0.005);
        assert!((distance - 100.0 / 14.1).abs() < 1e-9);

        let aashto = aashto_distance(1.5, 20.0, 0.0, 0.7).unwrap();
        assert!((aashto - (8.34 + 400.0 / 177.8)).abs() < 1e-9);
        assert!(aashto_distance(1.5, 20.0, -80.0, 0.7).is_err());
    }
}
