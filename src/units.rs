//! Unit conversion helpers used at the API boundary.
//!
//! Everything inside the solvers is SI (m/s, m, s, N). Callers that think in
//! km/h convert here.

/// 1 km/h expressed in m/s
pub const KMH_TO_M_PER_S: f64 = 0.277778;

/// 1 m/s expressed in km/h
pub const M_PER_S_TO_KMH: f64 = 18.0 / 5.0;

pub fn kmh_to_m_per_s(kmh: f64) -> f64 {
    kmh * KMH_TO_M_PER_S
}

pub fn m_per_s_to_kmh(m_per_s: f64) -> f64 {
    m_per_s * M_PER_S_TO_KMH
}

/// Format a value with two decimals for diagnostic output
pub fn nice(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kmh_round_trip_factor() {
        assert!((kmh_to_m_per_s(36.0) - 10.0).abs() < 1e-4);
        assert!((m_per_s_to_kmh(10.0) - 36.0).abs() < 1e-12);
    }

    #[test]
    fn test_nice_formatting() {
        assert_eq!(nice(3.14159), "3.14");
        assert_eq!(nice(-2.5), "-2.50");
    }
}
