//! Parameter structures for the rider, bicycle, environment and solvers.
//!
//! Defaults reproduce the reference road-bike scenario: a 70 kg rider on a
//! 10 kg bicycle with 700 mm wheels, riding on the hoods at sea level.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DynamicsError, DynamicsResult};
use crate::physics::atmosphere;
use crate::physics::wind::WindState;
use crate::physics::{VehicleParams, G_ACCEL};
use crate::units::kmh_to_m_per_s;

/// Top-level parameters container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameters {
    /// Rider and bicycle geometry, masses and coefficients
    pub vehicle: VehicleParameters,
    /// Air and wind conditions
    pub environment: EnvironmentParameters,
    /// Tolerances, step sizes and iteration caps
    pub solver: SolverParameters,
}

impl Parameters {
    /// Load parameters from JSON files, or use defaults if files don't exist
    pub fn load_or_default() -> Self {
        Self::load_from_dir("data/parameters")
    }

    /// Load parameters from specific directory
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let vehicle = load_json_or_default(dir.join("vehicle.json"), "vehicle");
        let environment = load_json_or_default(dir.join("environment.json"), "environment");
        let solver = load_json_or_default(dir.join("solver.json"), "solver");

        Self {
            vehicle,
            environment,
            solver,
        }
    }

    /// Build the per-evaluation vehicle value object, folding the air
    /// density of the configured environment into the drag factor
    pub fn vehicle_params(&self) -> DynamicsResult<VehicleParams> {
        self.vehicle.to_vehicle_params(self.environment.air_density_kg_per_m3())
    }

    /// Wind from the environment, converted to m/s
    pub fn wind(&self) -> WindState {
        self.environment.wind()
    }
}

fn load_json_or_default<T, P>(path: P, label: &str) -> T
where
    T: Default + for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    match std::fs::read_to_string(path.as_ref()) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(params) => {
                log::info!("Loaded {} parameters from {:?}", label, path.as_ref());
                params
            }
            Err(e) => {
                log::warn!("Failed to parse {} parameters: {}, using defaults", label, e);
                T::default()
            }
        },
        Err(_) => {
            log::info!("{} parameters file not found, using defaults", label);
            T::default()
        }
    }
}

/// Rider and bicycle parameters
///
/// Lengths follow the side view of the bicycle with the front wheel on the
/// left: `rear_crank_distance_m` is the horizontal arm from the rear contact
/// patch to the centre of mass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleParameters {
    /// Rider mass (kg)
    pub rider_mass_kg: f64,
    /// Bicycle mass including wheels (kg)
    pub bicycle_mass_kg: f64,
    /// Mass of one wheel (kg), used only for the rotational energy term
    pub wheel_mass_kg: f64,
    /// Wheel radius (m); 700c road wheel with tyre ≈ 0.35 m
    pub wheel_radius_m: f64,
    /// Axle-to-axle distance (m)
    pub wheel_base_m: f64,
    /// Effective rear-wheel-load arm (m)
    pub rear_crank_distance_m: f64,
    /// Height of the combined centre of mass above the ground (m)
    pub com_height_m: f64,
    /// Coefficient of rolling resistance
    /// Clinchers: 0.005, tubulars: 0.004, MTB: 0.012
    pub rolling_coefficient: f64,
    /// Drag coefficient times frontal area (m²)
    /// Hoods: 0.388, bar tops: 0.445, bar ends: 0.42, drops: 0.3, aero bars: 0.233
    pub drag_area_m2: f64,
    /// Tyre/road static friction coefficient
    /// 0.7 dry, 0.35 wet
    pub static_friction: f64,
}

impl VehicleParameters {
    pub fn total_mass_kg(&self) -> f64 {
        self.rider_mass_kg + self.bicycle_mass_kg
    }

    /// Check the geometric and physical invariants
    pub fn validate(&self) -> DynamicsResult<()> {
        let positive = [
            ("rider_mass_kg", self.rider_mass_kg),
            ("bicycle_mass_kg", self.bicycle_mass_kg),
            ("wheel_radius_m", self.wheel_radius_m),
            ("wheel_base_m", self.wheel_base_m),
            ("rear_crank_distance_m", self.rear_crank_distance_m),
            ("com_height_m", self.com_height_m),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(DynamicsError::invalid(format!("{} must be > 0, got {}", name, value)));
            }
        }
        if self.wheel_base_m <= self.rear_crank_distance_m {
            return Err(DynamicsError::invalid(format!(
                "wheel base ({} m) must exceed rear crank distance ({} m)",
                self.wheel_base_m, self.rear_crank_distance_m
            )));
        }
        if self.wheel_mass_kg < 0.0 || self.rolling_coefficient < 0.0 || self.drag_area_m2 < 0.0 {
            return Err(DynamicsError::invalid(
                "wheel mass, rolling coefficient and drag area must be non-negative",
            ));
        }
        if self.static_friction <= 0.0 {
            return Err(DynamicsError::invalid("static friction must be > 0"));
        }
        Ok(())
    }

    /// Aerodynamic drag factor K_A = ½·CdA·ρ (kg/m)
    pub fn drag_factor(&self, air_density_kg_per_m3: f64) -> f64 {
        0.5 * self.drag_area_m2 * air_density_kg_per_m3
    }

    pub fn to_vehicle_params(&self, air_density_kg_per_m3: f64) -> DynamicsResult<VehicleParams> {
        self.validate()?;
        let total_mass_kg = self.total_mass_kg();
        Ok(VehicleParams {
            total_mass_kg,
            total_weight_N: total_mass_kg * G_ACCEL,
            wheel_radius_m: self.wheel_radius_m,
            wheel_circumference_m: 2.0 * std::f64::consts::PI * self.wheel_radius_m,
            wheel_inertia_kg_m2: self.wheel_mass_kg * self.wheel_radius_m * self.wheel_radius_m,
            wheel_base_m: self.wheel_base_m,
            rear_crank_distance_m: self.rear_crank_distance_m,
            com_height_m: self.com_height_m,
            rolling_coefficient: self.rolling_coefficient,
            drag_factor: self.drag_factor(air_density_kg_per_m3),
            static_friction: self.static_friction,
        })
    }
}

impl Default for VehicleParameters {
    fn default() -> Self {
        Self {
            rider_mass_kg: 70.0,
            bicycle_mass_kg: 10.0,
            wheel_mass_kg: 1.0,
            wheel_radius_m: 0.35,
            wheel_base_m: 1.01,
            rear_crank_distance_m: 0.43,
            com_height_m: 1.15,
            rolling_coefficient: 0.005,
            drag_area_m2: 0.388,
            static_friction: 0.7,
        }
    }
}

/// Which air density formula feeds the drag factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DensityModel {
    /// Linear temperature fit with exponential elevation decay
    #[default]
    Simple,
    /// Hypsometric pressure with Tetens humidity correction
    Humid,
}

/// Air and wind conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentParameters {
    /// Air temperature (°C)
    pub temperature_celsius: f64,
    /// Elevation above sea level (m)
    pub elevation_m: f64,
    /// Relative humidity (%), only used by the humid density model
    pub relative_humidity_percent: f64,
    pub density_model: DensityModel,
    /// Wind speed (km/h)
    pub wind_speed_kmh: f64,
    /// Direction the wind blows from, relative to the direction of travel (degrees)
    pub wind_bearing_deg: f64,
}

impl EnvironmentParameters {
    pub fn air_density_kg_per_m3(&self) -> f64 {
        match self.density_model {
            DensityModel::Simple => atmosphere::simple_density(self.elevation_m, self.temperature_celsius),
            DensityModel::Humid => atmosphere::humid_density(
                self.elevation_m,
                self.temperature_celsius,
                self.relative_humidity_percent,
            ),
        }
    }

    pub fn wind(&self) -> WindState {
        WindState::new(kmh_to_m_per_s(self.wind_speed_kmh), self.wind_bearing_deg)
    }
}

impl Default for EnvironmentParameters {
    fn default() -> Self {
        Self {
            temperature_celsius: 25.0,
            elevation_m: 0.0,
            relative_humidity_percent: 50.0,
            density_model: DensityModel::Simple,
            wind_speed_kmh: 0.0,
            wind_bearing_deg: 0.0,
        }
    }
}

/// Numerical settings for the velocity solver and stopping simulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverParameters {
    /// Drivetrain efficiency (flat scalar)
    pub efficiency: f64,
    /// Newton-Raphson starting velocity (m/s), well above any cruising root
    pub initial_guess_m_per_s: f64,
    /// Convergence tolerance on |Δv| (m/s)
    pub tolerance_m_per_s: f64,
    /// Wind speed above which the tolerance widens (m/s)
    pub wide_wind_threshold_m_per_s: f64,
    /// Widened tolerance as a fraction of the wind speed
    pub wide_wind_tolerance_factor: f64,
    /// Iteration cap in strong wind
    pub max_iterations: usize,
    /// Iteration cap in light wind
    pub max_iterations_low_wind: usize,
    /// Time step of the force-integration stopping mode (s)
    pub stop_time_step_sec: f64,
    /// Velocity decrement of the energy-integration stopping mode (m/s)
    pub stop_velocity_decrement_m_per_s: f64,
    /// A stop is complete once the speed falls to this floor (m/s)
    pub stop_velocity_floor_m_per_s: f64,
    /// Step cap of the stopping simulator
    pub max_stop_steps: usize,
    /// Resolution of the critical braking fraction scan (g)
    pub traction_scan_step: f64,
}

impl SolverParameters {
    pub fn validate(&self) -> DynamicsResult<()> {
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(DynamicsError::invalid(format!(
                "efficiency must be in (0, 1], got {}",
                self.efficiency
            )));
        }
        if self.tolerance_m_per_s <= 0.0 || self.stop_time_step_sec <= 0.0 {
            return Err(DynamicsError::invalid("tolerance and time step must be > 0"));
        }
        if self.stop_velocity_decrement_m_per_s <= 0.0 {
            return Err(DynamicsError::invalid("velocity decrement must be > 0"));
        }
        if self.stop_velocity_floor_m_per_s < 0.0 {
            return Err(DynamicsError::invalid("velocity floor must be >= 0"));
        }
        if !(self.traction_scan_step > 0.0 && self.traction_scan_step <= 1.0) {
            return Err(DynamicsError::invalid("traction scan step must be in (0, 1]"));
        }
        Ok(())
    }

    /// Tolerance and iteration cap for a given wind speed
    pub fn newton_limits(&self, wind_speed_m_per_s: f64) -> (f64, usize) {
        if wind_speed_m_per_s > self.wide_wind_threshold_m_per_s {
            (
                self.wide_wind_tolerance_factor * wind_speed_m_per_s,
                self.max_iterations,
            )
        } else {
            (self.tolerance_m_per_s, self.max_iterations_low_wind)
        }
    }
}

impl Default for SolverParameters {
    fn default() -> Self {
        Self {
            efficiency: 0.95,
            initial_guess_m_per_s: 1000.0,
            tolerance_m_per_s: 0.05,
            wide_wind_threshold_m_per_s: 28.0,
            wide_wind_tolerance_factor: 0.02,
            max_iterations: 100,
            max_iterations_low_wind: 30,
            stop_time_step_sec: 0.05,
            stop_velocity_decrement_m_per_s: 0.05,
            stop_velocity_floor_m_per_s: 1.0,
            max_stop_steps: 10_000,
            traction_scan_step: 0.01,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vehicle_params() {
        let params = VehicleParameters::default();
        assert!((params.total_mass_kg() - 80.0).abs() < 1e-12);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_default_drag_factor() {
        let params = Parameters::default();
        let vehicle = params.vehicle_params().unwrap();
        // ½ · 0.388 · 1.1865
        assert!((vehicle.drag_factor - 0.2302).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let params = VehicleParameters {
            rear_crank_distance_m: 1.2,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(DynamicsError::InvalidParameter(_))
        ));

        let params = VehicleParameters {
            com_height_m: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_newton_limits_widen_in_strong_wind() {
        let solver = SolverParameters::default();
        assert_eq!(solver.newton_limits(5.0), (0.05, 30));
        let (tolerance, cap) = solver.newton_limits(30.0);
        assert!((tolerance - 0.6).abs() < 1e-12);
        assert_eq!(cap, 100);
    }

    #[test]
    fn test_serialization() {
        let params = Parameters::default();
        let json = serde_json::to_string_pretty(&params).unwrap();
        let parsed: Parameters = serde_json::from_str(&json).unwrap();
        assert!((parsed.vehicle.com_height_m - params.vehicle.com_height_m).abs() < 1e-12);
        assert_eq!(parsed.environment.density_model, DensityModel::Simple);
    }

    #[test]
    fn test_missing_dir_falls_back_to_defaults() {
        let params = Parameters::load_from_dir("/nonexistent/bike-dynamics");
        assert!((params.vehicle.wheel_base_m - 1.01).abs() < 1e-12);
    }
}
