//! Multi-octave fractal Brownian motion (fBm) layer settings.

use serde::{Deserialize, Serialize};

use super::PerlinNoise;

/// Configuration for one multi-octave noise layer sampled over a grid.
///
/// `frequency` is expressed in cycles across the whole map: a grid cell at
/// `(x, y)` is sampled at `(x / width * frequency, y / height * frequency)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractalNoiseConfig {
    /// Number of noise octaves.
    pub octaves: u32,
    /// Cycles across the map for the first octave.
    pub frequency: f64,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 6,
            frequency: 1.0,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl FractalNoiseConfig {
    /// Broad continent shapes, about four cycles across the map.
    pub fn continents(octaves: u32) -> Self {
        Self {
            octaves,
            frequency: 4.0,
            persistence: 0.55,
            lacunarity: 2.0,
        }
    }

    /// Fine surface detail, about twelve cycles across the map.
    pub fn detail() -> Self {
        Self {
            octaves: 4,
            frequency: 12.0,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }

    /// Ridged mountain chains along plate boundaries.
    pub fn ridges() -> Self {
        Self {
            octaves: 5,
            frequency: 8.0,
            persistence: 0.6,
            lacunarity: 2.0,
        }
    }

    /// Low-frequency temperature perturbation.
    pub fn temperature() -> Self {
        Self {
            octaves: 3,
            frequency: 6.0,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }

    /// Low-frequency moisture perturbation.
    pub fn moisture() -> Self {
        Self {
            octaves: 3,
            frequency: 5.0,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }

    /// Samples fBm at normalised map coordinates `(nx, ny)` in [0, 1].
    ///
    /// # Returns
    /// A value in approximately [-1, 1] (normalised by amplitude sum)
    pub fn sample_fbm(&self, noise: &PerlinNoise, nx: f64, ny: f64) -> f64 {
        noise.fbm(
            nx * self.frequency,
            ny * self.frequency,
            self.octaves,
            1.0,
            self.persistence,
            self.lacunarity,
        )
    }

    /// Samples ridged noise at normalised map coordinates `(nx, ny)`.
    pub fn sample_ridged(&self, noise: &PerlinNoise, nx: f64, ny: f64) -> f64 {
        noise.ridged(
            nx * self.frequency,
            ny * self.frequency,
            self.octaves,
            1.0,
            self.persistence,
            self.lacunarity,
        )
    }
}
