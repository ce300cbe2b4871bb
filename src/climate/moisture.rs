//! Moisture model: ocean proximity, latitude bands, rain shadow and noise.

use rayon::prelude::*;

use crate::noise::{FractalNoiseConfig, PerlinNoise};
use crate::terrain::Heightmap;

use super::coast::ocean_distance;
use super::temperature::{land_height, latitude};
use super::ClimateConfig;

/// Wet band along the equator (inter-tropical convergence zone).
#[inline]
pub fn tropical_moisture(lat: f32) -> f32 {
    (-lat * lat * 8.0).exp() * 0.3
}

/// Mid-latitude storm track.
#[inline]
pub fn temperate_moisture(lat: f32) -> f32 {
    let d = lat - 0.5;
    (-d * d * 20.0).exp() * 0.15
}

/// Moisture in [0, 1] for every cell of `elevation`.
///
/// Ocean cells get `config.ocean_moisture`. Land cells blend proximity to
/// the ocean (power 0.4 falloff over half the grid diagonal) with the two
/// latitude bands, lose up to half of that with altitude, then get ±0.15
/// of noise. Land that no ocean can reach counts as maximally far.
pub fn generate_moisture(
    elevation: &Heightmap,
    config: &ClimateConfig,
    noise: &PerlinNoise,
) -> Heightmap {
    let w = elevation.width();
    let h = elevation.height();
    let mut moisture = Heightmap::new(w, h, 0.0);
    if moisture.is_empty() {
        return moisture;
    }

    let dist = ocean_distance(elevation, config.sea_level);
    let max_dist = ((w as f32).powi(2) + (h as f32).powi(2)).sqrt() * 0.5;
    let layer = FractalNoiseConfig::moisture();
    let src = elevation.as_slice();

    moisture
        .as_mut_slice()
        .par_chunks_mut(w as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let lat = latitude(y as u32, h);
            let tropical = tropical_moisture(lat);
            let temperate = temperate_moisture(lat);
            let ny = y as f64 / h as f64;

            for (x, cell) in row.iter_mut().enumerate() {
                let i = y * w as usize + x;
                let e = src[i];
                if e < config.sea_level {
                    *cell = config.ocean_moisture;
                    continue;
                }

                let proximity = match dist[i] {
                    Some(d) => 1.0 - (d as f32 / max_dist).clamp(0.0, 1.0),
                    None => 0.0,
                };
                let ocean_factor = proximity.powf(0.4);
                let altitude_factor = 1.0 - land_height(e, config.sea_level) * 0.5;

                let mut m = ocean_factor * 0.5 + tropical + temperate;
                m *= altitude_factor;

                let nx = x as f64 / w as f64;
                m += layer.sample_fbm(noise, nx, ny) as f32 * 0.15;
                *cell = m.clamp(0.0, 1.0);
            }
        });

    moisture
}
