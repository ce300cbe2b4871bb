//! Tectonic plate data structures.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::random::RandomSource;

/// Probability that a freshly drawn plate is oceanic.
pub const OCEANIC_PROBABILITY: f32 = 0.45;

/// Type of crustal material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrustType {
    /// Thick, buoyant crust that forms continents.
    Continental,
    /// Thin, dense crust that forms ocean basins.
    Oceanic,
}

impl CrustType {
    /// Initial elevation written across the plate's cell.
    pub fn base_elevation(&self) -> f32 {
        match self {
            CrustType::Continental => 0.55,
            CrustType::Oceanic => 0.25,
        }
    }
}

/// A tectonic plate in grid space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TectonicPlate {
    /// Center in cell coordinates, `x ∈ [0, width)`, `y ∈ [0, height)`.
    pub center: Vec2,
    /// Drift direction, each component in [-1, 1).
    pub drift: Vec2,
    pub crust_type: CrustType,
}

impl TectonicPlate {
    /// Draws one plate from `rng`.
    ///
    /// Consumes five floats in a fixed order: center x, center y,
    /// drift x, drift y, crust type.
    pub fn random(rng: &mut RandomSource, width: u32, height: u32) -> Self {
        let cx = rng.next_float_range(0.0, width as f32);
        let cy = rng.next_float_range(0.0, height as f32);
        let dx = rng.next_float_range(-1.0, 1.0);
        let dy = rng.next_float_range(-1.0, 1.0);
        let crust_type = if rng.next_float() < OCEANIC_PROBABILITY {
            CrustType::Oceanic
        } else {
            CrustType::Continental
        };

        Self {
            center: Vec2::new(cx, cy),
            drift: Vec2::new(dx, dy),
            crust_type,
        }
    }

    pub fn is_oceanic(&self) -> bool {
        self.crust_type == CrustType::Oceanic
    }
}

/// Draws `count` plates in sequence.
pub fn generate_plates(
    rng: &mut RandomSource,
    count: u32,
    width: u32,
    height: u32,
) -> Vec<TectonicPlate> {
    (0..count)
        .map(|_| TectonicPlate::random(rng, width, height))
        .collect()
}
