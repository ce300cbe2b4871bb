//! Dense 2D scalar grid used for elevation, temperature and moisture.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::export::{ByteReader, ByteWriter, DecodeError};

/// Row-major grid of `f32` values.
///
/// Coordinates outside `width × height` are a caller bug and panic.
/// Only [`Heightmap::sample`] clamps its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heightmap {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl Heightmap {
    /// Creates a `width × height` grid filled with `fill`.
    pub fn new(width: u32, height: u32, fill: f32) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width as usize * height as usize],
        }
    }

    /// Wraps an existing buffer.
    ///
    /// # Panics
    /// Panics if `data.len() != width * height`.
    pub fn from_vec(width: u32, height: u32, data: Vec<f32>) -> Self {
        assert_eq!(
            data.len(),
            width as usize * height as usize,
            "buffer length does not match {}x{}",
            width,
            height
        );
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "({}, {}) outside {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f32) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    #[inline]
    pub fn get_mut(&mut self, x: u32, y: u32) -> &mut f32 {
        let i = self.index(x, y);
        &mut self.data[i]
    }

    /// Bilinear interpolation at fractional grid coordinates.
    ///
    /// Coordinates are clamped to `[0, width - 1] × [0, height - 1]`.
    pub fn sample(&self, fx: f32, fy: f32) -> f32 {
        let fx = fx.clamp(0.0, (self.width - 1) as f32);
        let fy = fy.clamp(0.0, (self.height - 1) as f32);

        let x0 = fx as u32;
        let y0 = fy as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let a = self.get(x0, y0) * (1.0 - tx) + self.get(x1, y0) * tx;
        let b = self.get(x0, y1) * (1.0 - tx) + self.get(x1, y1) * tx;
        a * (1.0 - ty) + b * ty
    }

    /// Samples with normalised coordinates, `(0, 0)` and `(1, 1)` being opposite corners.
    pub fn sample_uv(&self, u: f32, v: f32) -> f32 {
        self.sample(u * (self.width - 1) as f32, v * (self.height - 1) as f32)
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Adds `other * scale` elementwise.
    ///
    /// # Panics
    /// Panics if the dimensions differ.
    pub fn add(&mut self, other: &Heightmap, scale: f32) {
        assert_eq!(
            (self.width, self.height),
            (other.width, other.height),
            "grid dimensions differ"
        );
        self.data
            .par_iter_mut()
            .zip(other.data.par_iter())
            .for_each(|(v, o)| *v += o * scale);
    }

    pub fn multiply(&mut self, scale: f32) {
        self.data.par_iter_mut().for_each(|v| *v *= scale);
    }

    pub fn clamp(&mut self, lo: f32, hi: f32) {
        self.data.par_iter_mut().for_each(|v| *v = v.clamp(lo, hi));
    }

    /// Affinely maps `[min, max]` onto `[0, 1]`.
    ///
    /// Leaves the grid untouched when `max - min < 1e-8`.
    pub fn normalise(&mut self) {
        let lo = self.min_value();
        let hi = self.max_value();
        let range = hi - lo;
        if range < 1e-8 {
            return;
        }
        self.data.par_iter_mut().for_each(|v| *v = (*v - lo) / range);
    }

    /// Box-filter blur over a `(2r + 1)²` window with clamped edges.
    pub fn blur(&mut self, radius: u32) {
        if radius == 0 || self.data.is_empty() {
            return;
        }
        let w = self.width as i64;
        let h = self.height as i64;
        let r = radius as i64;
        let diam = 2 * radius + 1;
        let inv = 1.0 / (diam * diam) as f32;
        let src = &self.data;

        let mut out = vec![0.0f32; src.len()];
        out.par_chunks_mut(self.width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as i64;
                for (x, cell) in row.iter_mut().enumerate() {
                    let x = x as i64;
                    let mut sum = 0.0f32;
                    for dy in -r..=r {
                        let sy = (y + dy).clamp(0, h - 1);
                        for dx in -r..=r {
                            let sx = (x + dx).clamp(0, w - 1);
                            sum += src[(sy * w + sx) as usize];
                        }
                    }
                    *cell = sum * inv;
                }
            });
        self.data = out;
    }

    pub fn min_value(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Mean value, accumulated in `f64`.
    pub fn average(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.data.iter().map(|&v| v as f64).sum();
        (sum / self.data.len() as f64) as f32
    }

    /// Writes `width | height | width*height f32` (native-endian, row-major).
    pub fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.width);
        writer.write_u32(self.height);
        writer.write_f32_slice(&self.data);
    }

    pub fn decode(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let width = reader.read_u32()?;
        let height = reader.read_u32()?;
        let count = (width as usize)
            .checked_mul(height as usize)
            .ok_or(DecodeError::Truncated {
                needed: usize::MAX,
                remaining: reader.remaining(),
            })?;
        let data = reader.read_f32_vec(count)?;
        Ok(Self { width, height, data })
    }
}
