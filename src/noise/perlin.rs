//! Seeded 2D gradient noise.

use crate::random::RandomSource;

const TABLE_SIZE: usize = 256;

/// Classic 2D Perlin noise over an owned permutation table.
///
/// The table is built once from a seed and never mutated, so two fields
/// built from the same seed are observationally identical.
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    perm: [u8; TABLE_SIZE * 2],
}

impl PerlinNoise {
    /// Builds the permutation table with a Fisher-Yates shuffle driven by `seed`.
    pub fn new(seed: u64) -> Self {
        let mut rng = RandomSource::new(seed);
        let mut table = [0u8; TABLE_SIZE];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }
        for i in (1..TABLE_SIZE).rev() {
            let j = rng.next_int(0, i as i32) as usize;
            table.swap(i, j);
        }

        let mut perm = [0u8; TABLE_SIZE * 2];
        perm[..TABLE_SIZE].copy_from_slice(&table);
        perm[TABLE_SIZE..].copy_from_slice(&table);
        Self { perm }
    }

    /// Single-octave noise at `(x, y)`.
    ///
    /// Nominally within [-1, 1]; always within [-2, 2].
    pub fn noise(&self, x: f64, y: f64) -> f64 {
        let fx = x.floor();
        let fy = y.floor();
        let xi = (fx as i64 & 255) as usize;
        let yi = (fy as i64 & 255) as usize;

        let xf = x - fx;
        let yf = y - fy;
        let u = fade(xf);
        let v = fade(yf);

        let p = &self.perm;
        let aa = p[p[xi] as usize + yi];
        let ab = p[p[xi] as usize + yi + 1];
        let ba = p[p[xi + 1] as usize + yi];
        let bb = p[p[xi + 1] as usize + yi + 1];

        let x1 = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let x2 = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);
        lerp(x1, x2, v)
    }

    /// Fractal Brownian motion: `octaves` layers normalised by total amplitude.
    pub fn fbm(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        frequency: f64,
        persistence: f64,
        lacunarity: f64,
    ) -> f64 {
        self.accumulate(x, y, octaves, frequency, persistence, lacunarity, |n| n)
    }

    /// Ridged multi-octave noise, each octave contributing `(1 - |n|)^2`.
    pub fn ridged(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        frequency: f64,
        persistence: f64,
        lacunarity: f64,
    ) -> f64 {
        self.accumulate(x, y, octaves, frequency, persistence, lacunarity, |n| {
            let r = 1.0 - n.abs();
            r * r
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn accumulate<F: Fn(f64) -> f64>(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        frequency: f64,
        persistence: f64,
        lacunarity: f64,
        shape: F,
    ) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut max_amplitude = 0.0;
        let mut freq = frequency;

        for _ in 0..octaves {
            total += shape(self.noise(x * freq, y * freq)) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            freq *= lacunarity;
        }

        total / max_amplitude
    }
}

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points(count: usize) -> impl Iterator<Item = (f64, f64)> {
        let mut rng = RandomSource::new(777);
        (0..count).map(move |_| {
            (
                rng.next_float_range(-300.0, 300.0) as f64,
                rng.next_float_range(-300.0, 300.0) as f64,
            )
        })
    }

    #[test]
    fn test_noise_bounds() {
        let noise = PerlinNoise::new(42);
        for (x, y) in sample_points(10_000) {
            let n = noise.noise(x, y);
            assert!((-2.0..=2.0).contains(&n), "noise({}, {}) = {}", x, y, n);
        }
    }

    #[test]
    fn test_fbm_bounds() {
        let noise = PerlinNoise::new(42);
        for (x, y) in sample_points(10_000) {
            let n = noise.fbm(x, y, 6, 1.0, 0.5, 2.0);
            assert!((-1.5..=1.5).contains(&n), "fbm({}, {}) = {}", x, y, n);
        }
    }

    #[test]
    fn test_ridged_is_non_negative() {
        let noise = PerlinNoise::new(3);
        for (x, y) in sample_points(2_000) {
            let n = noise.ridged(x, y, 5, 1.0, 0.6, 2.0);
            assert!((0.0..=1.0).contains(&n), "ridged({}, {}) = {}", x, y, n);
        }
    }

    #[test]
    fn test_zero_at_lattice_points() {
        let noise = PerlinNoise::new(9);
        for i in -5..5 {
            for j in -5..5 {
                assert_eq!(noise.noise(i as f64, j as f64), 0.0);
            }
        }
    }

    #[test]
    fn test_same_seed_identical() {
        let a = PerlinNoise::new(1234);
        let b = PerlinNoise::new(1234);
        for (x, y) in sample_points(500) {
            assert_eq!(a.noise(x, y), b.noise(x, y));
            assert_eq!(a.fbm(x, y, 4, 1.0, 0.5, 2.0), b.fbm(x, y, 4, 1.0, 0.5, 2.0));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = PerlinNoise::new(1);
        let b = PerlinNoise::new(2);
        let differing = sample_points(200)
            .filter(|&(x, y)| a.noise(x, y) != b.noise(x, y))
            .count();
        assert!(differing > 150);
    }

    #[test]
    fn test_permutation_is_a_permutation() {
        let noise = PerlinNoise::new(5);
        let mut seen = [false; TABLE_SIZE];
        for &v in &noise.perm[..TABLE_SIZE] {
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(noise.perm[..TABLE_SIZE], noise.perm[TABLE_SIZE..]);
    }
}
