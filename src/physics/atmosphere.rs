//! Air pressure and density.
//!
//! Closed-form collaborators that feed the density term of the aerodynamic
//! drag factor K_A = ½·CdA·ρ.
//!
//! References:
//! - Hypsometric formula for pressure vs. altitude
//! - Tetens, Z. Geophys. 1930 (saturation vapour pressure)

/// Standard sea-level pressure (hPa)
pub const SEA_LEVEL_PRESSURE_HPA: f64 = 1013.25;

const KELVIN_OFFSET: f64 = 273.15;

/// Station pressure (hPa) at `altitude_m` for air at `temperature_celsius`
pub fn pressure_hpa(altitude_m: f64, temperature_celsius: f64) -> f64 {
    let kelvin = temperature_celsius + KELVIN_OFFSET;
    let ratio = 1.0 + (altitude_m * 0.0065) / kelvin;
    SEA_LEVEL_PRESSURE_HPA / ratio.powf(5.257)
}

/// Saturation vapour pressure (kPa), Tetens form with the ice coefficients
/// below freezing
pub fn saturation_pressure_kpa(temperature_celsius: f64) -> f64 {
    if temperature_celsius >= 0.0 {
        0.61078 * ((17.270 * temperature_celsius) / (temperature_celsius + 237.3)).exp()
    } else {
        0.61078 * ((21.875 * temperature_celsius) / (temperature_celsius + 265.5)).exp()
    }
}

/// Moist air density (kg/m³)
pub fn humid_density(altitude_m: f64, temperature_celsius: f64, relative_humidity_percent: f64) -> f64 {
    let kelvin = temperature_celsius + KELVIN_OFFSET;
    let pressure = pressure_hpa(altitude_m, temperature_celsius);
    let vapour = saturation_pressure_kpa(temperature_celsius);
    (0.0034848 / kelvin) * (pressure * 100.0 - 0.0037960 * relative_humidity_percent * vapour)
}

/// Dry air density (kg/m³) from a linear temperature fit and a 7 km scale height
pub fn simple_density(elevation_m: f64, temperature_celsius: f64) -> f64 {
    (1.293 - 0.00426 * temperature_celsius) * (-elevation_m / 7000.0).exp()
}
