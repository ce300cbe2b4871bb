//! Local elevation edits and incremental biome reclassification.

use serde::{Deserialize, Serialize};

use crate::biomes::classify;
use crate::tectonics::wrapped_dx;

use super::Planet;

/// A Gaussian raise/lower brush.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    /// Radius in cells; the falloff σ is half of this.
    pub radius: f32,
    /// Peak change at the center. Negative lowers terrain.
    pub strength: f32,
}

impl Brush {
    pub fn raise(radius: f32, strength: f32) -> Self {
        Self {
            radius,
            strength: strength.abs(),
        }
    }

    pub fn lower(radius: f32, strength: f32) -> Self {
        Self {
            radius,
            strength: -strength.abs(),
        }
    }

    /// Weight at squared distance `d2` from the center.
    #[inline]
    pub fn weight(&self, d2: f32) -> f32 {
        let sigma = self.radius * 0.5;
        if sigma <= 0.0 {
            return if d2 == 0.0 { 1.0 } else { 0.0 };
        }
        (-d2 / (2.0 * sigma * sigma)).exp()
    }

    /// Half-size of the square window the brush touches.
    pub fn half_size(&self) -> u32 {
        self.radius.max(0.0).ceil() as u32
    }
}

/// Square neighbourhood around a cell, wrapping in X and cut off in Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub cx: u32,
    pub cy: u32,
    pub half_size: u32,
}

impl Region {
    pub fn new(cx: u32, cy: u32, half_size: u32) -> Self {
        Self { cx, cy, half_size }
    }

    /// Distinct columns covered, wrapped into `[0, width)`.
    pub fn columns(&self, width: u32) -> Vec<u32> {
        let span = 2 * self.half_size as u64 + 1;
        if span >= width as u64 {
            return (0..width).collect();
        }
        let w = width as i64;
        let start = self.cx as i64 - self.half_size as i64;
        (0..span as i64)
            .map(|i| (start + i).rem_euclid(w) as u32)
            .collect()
    }

    /// Rows covered, clipped to `[0, height)`.
    pub fn rows(&self, height: u32) -> std::ops::Range<u32> {
        let lo = self.cy.saturating_sub(self.half_size);
        let hi = self
            .cy
            .saturating_add(self.half_size)
            .saturating_add(1)
            .min(height);
        lo..hi.max(lo)
    }

    /// Every covered cell, each exactly once.
    pub fn cells(&self, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
        let columns = self.columns(width);
        self.rows(height)
            .flat_map(move |y| columns.clone().into_iter().map(move |x| (x, y)))
    }
}

impl Planet {
    /// Raises or lowers elevation around `(cx, cy)` and returns the touched region.
    ///
    /// Results are clamped to [0, 1]. Biomes are left stale until
    /// [`Planet::reclassify_region`] is called with the returned region.
    ///
    /// # Panics
    /// Panics if `(cx, cy)` is outside the grid.
    pub fn apply_brush(&mut self, cx: u32, cy: u32, brush: &Brush) -> Region {
        assert!(
            cx < self.width && cy < self.height,
            "brush center ({}, {}) outside {}x{} planet",
            cx,
            cy,
            self.width,
            self.height
        );
        let region = Region::new(cx, cy, brush.half_size());
        let width = self.width as f32;

        for (x, y) in region.cells(self.width, self.height) {
            let dx = wrapped_dx(x as f32, cx as f32, width);
            let dy = y as f32 - cy as f32;
            let delta = brush.strength * brush.weight(dx * dx + dy * dy);
            let cell = self.elevation.get_mut(x, y);
            *cell = (*cell + delta).clamp(0.0, 1.0);
        }

        region
    }

    /// Re-runs the classifier over `region` and refreshes summary statistics.
    ///
    /// Classifies the whole planet first if it has never been classified.
    pub fn reclassify_region(&mut self, region: &Region) {
        if !self.is_classified() {
            self.classify_biomes();
            return;
        }
        for (x, y) in region.cells(self.width, self.height) {
            let i = self.elevation.index(x, y);
            self.biomes[i] = classify(
                self.elevation.get(x, y),
                self.temperature.get(x, y),
                self.moisture.get(x, y),
                self.sea_level,
            );
        }
        self.update_stats();
    }
}
