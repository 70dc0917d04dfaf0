//! Bike Dynamics - Entry point
//!
//! Diagnostic front end over the force model and solvers.
//!
//! CLI Usage:
//!   cargo run -- cruise --power 200              # Cruise speed at 200 W
//!   cargo run -- stop --speed 20 --brake-g 0.3   # Braking distance from 20 km/h
//!   cargo run -- stop --speed 20 --brake-g 0.3 --mode energy --trace
//!   cargo run -- traction                        # Critical braking fractions

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use bike_dynamics::{
    config::{DensityModel, Parameters},
    export::{export_energy_csv, export_run_csv, export_stop_json, StopReport},
    geometry::{spoke_length, SpokeGeometry},
    physics::{atmosphere, moments, Braking, MomentPoint},
    solver::{CoastDownTest, IntegrationMode, StopScenario, StoppingSimulator, VelocitySolver},
    units::{kmh_to_m_per_s, m_per_s_to_kmh},
    DynamicsError,
};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "bike-dynamics")]
#[command(about = "Bicycle cruise speed and braking distance calculator", long_about = None)]
struct Args {
    /// Directory holding vehicle.json, environment.json and solver.json
    #[arg(long)]
    params_dir: Option<PathBuf>,
    /// Wind speed (km/h), overrides the environment file
    #[arg(long)]
    wind: Option<f64>,
    /// Bearing the wind blows from, relative to travel (degrees)
    #[arg(long)]
    wind_deg: Option<f64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Steady-state speed sustained by a given power
    Cruise {
        /// Rider power (W)
        #[arg(long, default_value_t = 200.0)]
        power: f64,
        /// Road grade (%)
        #[arg(long, default_value_t = 0.0)]
        grade: f64,
    },
    /// Braking distance and time
    Stop {
        /// Initial speed (km/h)
        #[arg(long, default_value_t = 20.0)]
        speed: f64,
        /// Braking deceleration (fraction of g)
        #[arg(long, default_value_t = 0.3)]
        brake_g: f64,
        /// Rear brake share; front-only policy when omitted
        #[arg(long)]
        rear_fraction: Option<f64>,
        /// Road grade (%)
        #[arg(long, default_value_t = 0.0)]
        grade: f64,
        #[arg(long, value_enum, default_value_t = ModeArg::Force)]
        mode: ModeArg,
        /// Export the per-step trace to CSV and the result to JSON
        #[arg(long, default_value_t = false)]
        trace: bool,
    },
    /// Wheel loads and critical braking fractions
    Traction {
        /// Braking deceleration for the load split (fraction of g)
        #[arg(long, default_value_t = 0.3)]
        brake_g: f64,
    },
    /// Air density for the configured environment
    Density,
    /// Spoke lengths for the reference 700c wheel
    Spokes {
        #[arg(long, default_value_t = 0)]
        crossings: u32,
    },
    /// Estimate rolling resistance from a timed coast-down
    CoastDown {
        /// Measured time from 20 to 5 km/h (s)
        #[arg(long, default_value_t = 20.0)]
        duration: f64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Force,
    Energy,
}

impl From<ModeArg> for IntegrationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Force => IntegrationMode::Force,
            ModeArg::Energy => IntegrationMode::Energy,
        }
    }
}

fn load_parameters(args: &Args) -> Parameters {
    let mut params = match &args.params_dir {
        Some(dir) => Parameters::load_from_dir(dir),
        None => Parameters::load_or_default(),
    };
    if let Some(wind) = args.wind {
        params.environment.wind_speed_kmh = wind;
    }
    if let Some(deg) = args.wind_deg {
        params.environment.wind_bearing_deg = deg;
    }
    params
}

fn run_cruise(params: &Parameters, power: f64, grade: f64) -> Result<()> {
    let vehicle = params.vehicle_params()?;
    let wind = params.wind();
    let other_resistance = vehicle.rolling_coefficient * vehicle.total_weight_N
        + grade / 100.0 * vehicle.total_weight_N;

    let solver = VelocitySolver::new(params.solver.clone());
    let velocity = solver.solve(vehicle.drag_factor, wind, other_resistance, power)?;

    println!("=== Cruise ===");
    println!("Power: {:.0} W, grade: {:.1}%", power, grade);
    println!("Wind: {:.1} km/h from {:.0}°", m_per_s_to_kmh(wind.speed_m_per_s), wind.bearing_deg);
    println!("Velocity: {:.2} km/h ({:.3} m/s)", m_per_s_to_kmh(velocity), velocity);
    Ok(())
}

fn run_stop(
    params: &Parameters,
    speed_kmh: f64,
    brake_g: f64,
    rear_fraction: Option<f64>,
    grade: f64,
    mode: IntegrationMode,
    trace: bool,
) -> Result<()> {
    let braking = match rear_fraction {
        Some(rear) => Braking::with_rear_fraction(brake_g, rear)?,
        None => Braking::with_default_policy(brake_g)?,
    };
    let scenario = StopScenario {
        initial_velocity_m_per_s: kmh_to_m_per_s(speed_kmh),
        wind: params.wind(),
        grade_percent: grade,
        braking,
    };
    let simulator = StoppingSimulator::new(params.vehicle_params()?, params.solver.clone()).with_trace(trace);

    println!("=== Stop ({:?}) ===", mode);
    println!("From {:.1} km/h at {:.2} g (rear share {:.2})", speed_kmh, brake_g, braking.rear_fraction);

    match simulator.simulate(&scenario, mode) {
        Ok(outcome) => {
            println!("Distance: {:.2} m", outcome.distance_m);
            println!("Time: {:.2} s", outcome.time_sec);
            println!("Steps: {}", outcome.steps);

            if trace {
                if let Some(run) = &outcome.run {
                    let path = export_run_csv(run)?;
                    println!("Trace: {}", path.display());
                    if !run.energy_steps.is_empty() {
                        let path = export_energy_csv(&run.energy_steps)?;
                        println!("Energy steps: {}", path.display());
                    }
                }
                let path = export_stop_json(&StopReport::new(params, &scenario, &outcome))?;
                println!("Report: {}", path.display());
            }
            Ok(())
        }
        Err(e @ DynamicsError::Infeasible { .. }) => {
            println!("Infeasible: {}", e);
            Ok(())
        }
        Err(e) => Err(anyhow!(e)),
    }
}

fn run_traction(params: &Parameters, brake_g: f64) -> Result<()> {
    let vehicle = params.vehicle_params()?;
    let step = params.solver.traction_scan_step;

    let loads = moments::normal_forces(
        vehicle.wheel_base_m,
        vehicle.rear_crank_distance_m,
        vehicle.com_height_m,
        vehicle.total_mass_kg,
        brake_g,
    );
    println!("=== Traction ===");
    println!("At {:.2} g: front {:.1} N, rear {:.1} N", brake_g, loads.front_N, loads.rear_N);

    for point in [MomentPoint::OverFrontWheel, MomentPoint::OverRearWheel, MomentPoint::CenterOfMass] {
        println!(
            "Critical braking ({:?}): {:.2} g",
            point,
            moments::critical_brake_fraction(&vehicle, point, step)
        );
    }
    println!("Max rear-only braking: {:.3} g", moments::max_rear_brake_g(&vehicle));
    match moments::max_front_brake_g(&vehicle) {
        Ok(front) => println!("Max front-only braking: {:.3} g", front),
        Err(e) => println!("Max front-only braking: n/a ({})", e),
    }
    Ok(())
}

fn run_density(params: &Parameters) {
    let env = &params.environment;
    println!("=== Air ===");
    println!(
        "{:.1} °C at {:.0} m, {:.0}% RH",
        env.temperature_celsius, env.elevation_m, env.relative_humidity_percent
    );
    println!("Pressure: {:.1} hPa", atmosphere::pressure_hpa(env.elevation_m, env.temperature_celsius));
    println!(
        "Density (simple): {:.4} kg/m³",
        atmosphere::simple_density(env.elevation_m, env.temperature_celsius)
    );
    println!(
        "Density (humid): {:.4} kg/m³",
        atmosphere::humid_density(env.elevation_m, env.temperature_celsius, env.relative_humidity_percent)
    );
    let model = match env.density_model {
        DensityModel::Simple => "simple",
        DensityModel::Humid => "humid",
    };
    println!("Drag uses the {} model: {:.4} kg/m³", model, env.air_density_kg_per_m3());
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let params = load_parameters(&args);
    log::info!("Bike Dynamics starting: {:?}", args.command);

    match &args.command {
        Command::Cruise { power, grade } => run_cruise(&params, *power, *grade)?,
        Command::Stop {
            speed,
            brake_g,
            rear_fraction,
            grade,
            mode,
            trace,
        } => run_stop(&params, *speed, *brake_g, *rear_fraction, *grade, (*mode).into(), *trace)?,
        Command::Traction { brake_g } => run_traction(&params, *brake_g)?,
        Command::Density => run_density(&params),
        Command::Spokes { crossings } => {
            let geometry = SpokeGeometry {
                non_gear_side_crossings: *crossings,
                gear_side_crossings: *crossings,
                ..Default::default()
            };
            let lengths = spoke_length(&geometry);
            println!("Non-gear side length: {:.0} mm", lengths.non_gear_side_mm);
            println!("Gear side length: {:.0} mm", lengths.gear_side_mm);
        }
        Command::CoastDown { duration } => {
            let test = CoastDownTest {
                duration_sec: *duration,
                ..Default::default()
            };
            match test.estimate_rolling_coefficient()? {
                Some(c_r) => println!("Best c_r = {:.3}", c_r),
                None => println!("Could not find a c_r"),
            }
        }
    }

    Ok(())
}
