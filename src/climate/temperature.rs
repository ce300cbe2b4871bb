//! Annual-mean temperature model.

use rayon::prelude::*;

use crate::noise::{FractalNoiseConfig, PerlinNoise};
use crate::terrain::Heightmap;

use super::ClimateConfig;

/// Distance from the equator for a row: 0 at the middle row, 1 at the edges.
#[inline]
pub fn latitude(y: u32, height: u32) -> f32 {
    (2.0 * y as f32 / height as f32 - 1.0).abs()
}

/// Height above sea level normalised to [0, 1] over the land range.
#[inline]
pub fn land_height(elevation: f32, sea_level: f32) -> f32 {
    (elevation - sea_level) / (1.0 - sea_level)
}

/// Temperature (°C) for every cell of `elevation`.
///
/// Quadratic cooling towards the poles, a lapse-rate penalty over land,
/// ocean cells pulled 30% towards the base temperature, plus ±5 °C of noise.
pub fn generate_temperature(
    elevation: &Heightmap,
    config: &ClimateConfig,
    noise: &PerlinNoise,
) -> Heightmap {
    let w = elevation.width();
    let h = elevation.height();
    let layer = FractalNoiseConfig::temperature();
    let mut temp = Heightmap::new(w, h, 0.0);
    if temp.is_empty() {
        return temp;
    }

    let src = elevation.as_slice();
    temp.as_mut_slice()
        .par_chunks_mut(w as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let lat = latitude(y as u32, h);
            let lat_temp = config.base_temperature - config.temperature_range * 0.5 * (lat * lat);
            let ny = y as f64 / h as f64;

            for (x, cell) in row.iter_mut().enumerate() {
                let e = src[y * w as usize + x];
                let mut t = lat_temp;

                if e > config.sea_level {
                    t -= land_height(e, config.sea_level) * config.altitude_lapse;
                }
                if e < config.sea_level {
                    t = t * 0.7 + config.base_temperature * 0.3;
                }

                let nx = x as f64 / w as f64;
                t += layer.sample_fbm(noise, nx, ny) as f32 * 5.0;
                *cell = t;
            }
        });

    temp
}
