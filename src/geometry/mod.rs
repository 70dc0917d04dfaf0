//! Wheel geometry.

mod spoke;

pub use spoke::{spoke_length, SpokeGeometry, SpokeLengths};
