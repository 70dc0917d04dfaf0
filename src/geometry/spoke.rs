//! Spoke length from hub and rim geometry.
//!
//! Cosine rule in the plane of the wheel, with the flange offset added in
//! quadrature:
//!
//! L² = (ERD/2)² + (d/2)² + w² − ERD·(d/2)·cos(720°·X / N)
//!
//! Where:
//! - ERD = effective (internal) rim diameter
//! - d   = hub flange diameter
//! - w   = flange distance from the hub centre line
//! - X   = crossings, N = number of spokes
//!
//! Lengths are rounded to the nearest millimetre and the rim thickness is
//! added. Checked against the Sapim spoke calculator.

use serde::{Deserialize, Serialize};

/// Hub and rim dimensions (mm)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpokeGeometry {
    pub total_hub_length_mm: f64,
    /// Flange distance from the non-gear hub end
    pub non_gear_side_hub_length_mm: f64,
    /// Flange distance from the gear-side hub end
    pub gear_side_hub_length_mm: f64,
    pub non_gear_side_flange_diameter_mm: f64,
    pub gear_side_flange_diameter_mm: f64,
    pub internal_rim_diameter_mm: f64,
    pub rim_thickness_mm: f64,
    pub num_spokes: u32,
    pub non_gear_side_crossings: u32,
    pub gear_side_crossings: u32,
}

impl Default for SpokeGeometry {
    /// 700c rim on a 120 mm hub, radially laced
    fn default() -> Self {
        Self {
            total_hub_length_mm: 120.0,
            non_gear_side_hub_length_mm: 16.0,
            gear_side_hub_length_mm: 30.0,
            non_gear_side_flange_diameter_mm: 16.0,
            gear_side_flange_diameter_mm: 16.0,
            internal_rim_diameter_mm: 622.0,
            rim_thickness_mm: 5.0,
            num_spokes: 32,
            non_gear_side_crossings: 0,
            gear_side_crossings: 0,
        }
    }
}

/// Spoke lengths for both sides of the wheel (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpokeLengths {
    pub non_gear_side_mm: f64,
    pub gear_side_mm: f64,
}

fn side_length(geometry: &SpokeGeometry, hub_length_mm: f64, flange_diameter_mm: f64, crossings: u32) -> f64 {
    let offset = geometry.total_hub_length_mm / 2.0 - hub_length_mm;
    let rim_radius = geometry.internal_rim_diameter_mm / 2.0;
    let flange_radius = flange_diameter_mm / 2.0;
    let angle = (720.0 * crossings as f64 / geometry.num_spokes as f64).to_radians();

    let squared = rim_radius * rim_radius + flange_radius * flange_radius + offset * offset
        - geometry.internal_rim_diameter_mm * flange_radius * angle.cos();
    squared.sqrt().round() + geometry.rim_thickness_mm
}

pub fn spoke_length(geometry: &SpokeGeometry) -> SpokeLengths {
    SpokeLengths {
        non_gear_side_mm: side_length(
            geometry,
            geometry.non_gear_side_hub_length_mm,
            geometry.non_gear_side_flange_diameter_mm,
            geometry.non_gear_side_crossings,
        ),
        gear_side_mm: side_length(
            geometry,
            geometry.gear_side_hub_length_mm,
            geometry.gear_side_flange_diameter_mm,
            geometry.gear_side_crossings,
        ),
    }
}
