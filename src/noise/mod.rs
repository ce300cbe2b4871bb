//! Noise generation module for terrain synthesis.
//!
//! Provides a seeded Perlin field and the fractal layer settings used by
//! the terrain and climate stages.

mod fractal;
mod perlin;

pub use fractal::FractalNoiseConfig;
pub use perlin::PerlinNoise;
