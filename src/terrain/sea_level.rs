//! Percentile-based sea-level calibration.

use log::{debug, warn};

use super::Heightmap;

/// Remaps `elevation` so exactly `sea_level` of the cells sit below `sea_level`.
///
/// The grid is normalised to [0, 1], the `sea_level`-th percentile becomes the
/// water threshold, values below it are compressed into `[0, sea_level)` and
/// values at or above it into `[sea_level, 1]`. When several cells tie on
/// the threshold, the first of them in row-major order are split off into
/// the ocean so the count below `sea_level` is still exact.
///
/// # Returns
/// The threshold (in normalised units) that was mapped onto `sea_level`
pub fn calibrate_sea_level(elevation: &mut Heightmap, sea_level: f32) -> f32 {
    if elevation.is_empty() {
        return sea_level;
    }
    if elevation.max_value() - elevation.min_value() < 1e-8 {
        warn!("Elevation grid has no variance; sea level calibration will be degenerate");
    }
    elevation.normalise();

    let mut sorted = elevation.as_slice().to_vec();
    sorted.sort_by(f32::total_cmp);
    let sea_idx = ((sea_level * sorted.len() as f32) as usize).min(sorted.len() - 1);
    let threshold = sorted[sea_idx];

    let below_max = float_below(sea_level);
    let above_span = 1.0 - threshold;

    let strictly_below = sorted.partition_point(|&v| v < threshold);
    let mut tied_to_ocean = sea_idx.saturating_sub(strictly_below);
    if tied_to_ocean > 0 {
        debug!(
            "{} cells tie at threshold {:.6}; splitting by rank",
            sorted.partition_point(|&v| v <= threshold) - strictly_below,
            threshold
        );
    }

    for e in elevation.as_mut_slice() {
        *e = if *e < threshold {
            ((*e / threshold) * sea_level).min(below_max)
        } else if *e == threshold && tied_to_ocean > 0 {
            tied_to_ocean -= 1;
            below_max
        } else if above_span > 1e-8 {
            sea_level + ((*e - threshold) / above_span) * (1.0 - sea_level)
        } else {
            sea_level
        };
    }

    threshold
}

/// Largest float strictly below a positive finite `value`.
#[inline]
fn float_below(value: f32) -> f32 {
    debug_assert!(value > 0.0 && value.is_finite());
    f32::from_bits(value.to_bits() - 1)
}

/// Fraction of cells strictly below `sea_level`.
pub fn ocean_fraction(elevation: &Heightmap, sea_level: f32) -> f32 {
    if elevation.is_empty() {
        return 0.0;
    }
    let below = elevation.as_slice().iter().filter(|&&e| e < sea_level).count();
    below as f32 / elevation.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RandomSource;

    fn random_grid(width: u32, height: u32, seed: u64) -> Heightmap {
        let mut rng = RandomSource::new(seed);
        let data = (0..width * height).map(|_| rng.next_float() * 3.0 - 1.0).collect();
        Heightmap::from_vec(width, height, data)
    }

    #[test]
    fn test_exact_ocean_fraction() {
        for &sea in &[0.1f32, 0.4, 0.55, 0.9] {
            let mut grid = random_grid(64, 48, 17);
            calibrate_sea_level(&mut grid, sea);
            let n = grid.len() as f32;
            let frac = ocean_fraction(&grid, sea);
            assert!(
                (frac - sea).abs() <= 1.0 / n + 1e-6,
                "sea {} produced ocean fraction {}",
                sea,
                frac
            );
        }
    }

    #[test]
    fn test_range_after_calibration() {
        let mut grid = random_grid(32, 32, 4);
        calibrate_sea_level(&mut grid, 0.4);
        assert_eq!(grid.min_value(), 0.0);
        assert!((grid.max_value() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_order_preserved() {
        let mut grid = random_grid(16, 16, 8);
        let before = grid.clone();
        calibrate_sea_level(&mut grid, 0.3);
        for i in 0..before.len() {
            for j in 0..before.len() {
                if before.as_slice()[i] < before.as_slice()[j] {
                    assert!(grid.as_slice()[i] <= grid.as_slice()[j]);
                }
            }
        }
    }

    #[test]
    fn test_flat_grid_does_not_produce_nan() {
        let mut grid = Heightmap::new(8, 8, 0.7);
        calibrate_sea_level(&mut grid, 0.4);
        assert!(grid.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_heavy_ties_still_exact() {
        let mut rng = RandomSource::new(5);
        let data = (0..64 * 64)
            .map(|i| if i % 50 == 0 { rng.next_float() } else { 0.6895 })
            .collect();
        let mut grid = Heightmap::from_vec(64, 64, data);
        for &sea in &[0.25f32, 0.4, 0.75] {
            let mut g = grid.clone();
            calibrate_sea_level(&mut g, sea);
            let n = g.len() as f32;
            let frac = ocean_fraction(&g, sea);
            assert!((frac - sea).abs() <= 1.0 / n + 1e-6, "sea {} -> {}", sea, frac);
        }
        calibrate_sea_level(&mut grid, 0.4);
        assert!(grid.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_float_below() {
        let v = 0.4f32;
        assert!(float_below(v) < v);
        assert_eq!(f32::from_bits(float_below(v).to_bits() + 1), v);
    }
}
