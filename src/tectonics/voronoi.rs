//! Voronoi plate partition on a cylinder (wraps in X only).

use glam::Vec2;
use rayon::prelude::*;

use super::plate::TectonicPlate;

/// Per-cell plate assignment, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateMap {
    width: u32,
    height: u32,
    ids: Vec<u32>,
}

impl PlateMap {
    /// Assigns every cell to its nearest plate center.
    ///
    /// Distance wraps horizontally so the map is continuous across the
    /// left/right edge. Ties go to the lowest plate index.
    pub fn assign(plates: &[TectonicPlate], width: u32, height: u32) -> Self {
        let centers: Vec<Vec2> = plates.iter().map(|p| p.center).collect();
        let mut ids = vec![0u32; width as usize * height as usize];

        ids.par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, id) in row.iter_mut().enumerate() {
                    *id = nearest_center(&centers, x as f32, y as f32, width as f32);
                }
            });

        Self { width, height, ids }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        debug_assert!(x < self.width && y < self.height);
        self.ids[y as usize * self.width as usize + x as usize]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.ids
    }

    /// Number of cells assigned to each plate.
    pub fn cell_counts(&self, num_plates: usize) -> Vec<usize> {
        let mut counts = vec![0usize; num_plates];
        for &id in &self.ids {
            counts[id as usize] += 1;
        }
        counts
    }
}

/// Horizontal offset folded into `[-width/2, width/2]`.
#[inline]
pub fn wrapped_dx(x: f32, cx: f32, width: f32) -> f32 {
    let mut dx = x - cx;
    if dx > width * 0.5 {
        dx -= width;
    }
    if dx < -width * 0.5 {
        dx += width;
    }
    dx
}

fn nearest_center(centers: &[Vec2], x: f32, y: f32, width: f32) -> u32 {
    let mut best_idx = 0;
    let mut best_dist_sq = f32::MAX;

    for (idx, center) in centers.iter().enumerate() {
        let dx = wrapped_dx(x, center.x, width);
        let dy = y - center.y;
        let dist_sq = dx * dx + dy * dy;
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best_idx = idx;
        }
    }

    best_idx as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tectonics::CrustType;

    fn plate_at(x: f32, y: f32) -> TectonicPlate {
        TectonicPlate {
            center: Vec2::new(x, y),
            drift: Vec2::ZERO,
            crust_type: CrustType::Continental,
        }
    }

    #[test]
    fn test_wrapped_dx() {
        assert_eq!(wrapped_dx(1.0, 63.0, 64.0), 2.0);
        assert_eq!(wrapped_dx(63.0, 1.0, 64.0), -2.0);
        assert_eq!(wrapped_dx(10.0, 4.0, 64.0), 6.0);
    }

    #[test]
    fn test_assignment_wraps_horizontally() {
        // Cell (1, 8) is 3 cells from the right plate across the seam,
        // but 9 cells from the left one.
        let plates = vec![plate_at(10.0, 8.0), plate_at(62.0, 8.0)];
        let map = PlateMap::assign(&plates, 64, 16);
        assert_eq!(map.get(1, 8), 1);
        assert_eq!(map.get(8, 8), 0);
    }

    #[test]
    fn test_assignment_does_not_wrap_vertically() {
        let plates = vec![plate_at(8.0, 1.0), plate_at(8.0, 10.0)];
        let map = PlateMap::assign(&plates, 16, 16);
        // Row 15 is closer to plate 1 directly; wrapping would pick plate 0.
        assert_eq!(map.get(8, 15), 1);
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let plates = vec![plate_at(4.0, 4.0), plate_at(4.0, 4.0)];
        let map = PlateMap::assign(&plates, 8, 8);
        assert!(map.as_slice().iter().all(|&id| id == 0));
    }

    #[test]
    fn test_cell_counts_cover_grid() {
        let plates = vec![plate_at(2.0, 2.0), plate_at(12.0, 12.0), plate_at(20.0, 4.0)];
        let map = PlateMap::assign(&plates, 24, 16);
        let counts = map.cell_counts(plates.len());
        assert_eq!(counts.iter().sum::<usize>(), 24 * 16);
        assert!(counts.iter().all(|&c| c > 0));
    }
}
