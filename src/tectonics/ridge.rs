//! Mountain ridges along plate boundaries.

use crate::noise::{FractalNoiseConfig, PerlinNoise};
use crate::terrain::Heightmap;

use super::voronoi::PlateMap;

/// Returns the interior cells whose 4-neighbourhood touches another plate.
///
/// Border rows and columns are never boundary cells.
pub fn boundary_cells(plates: &PlateMap) -> Vec<(u32, u32)> {
    let w = plates.width();
    let h = plates.height();
    let mut cells = Vec::new();
    if w < 3 || h < 3 {
        return cells;
    }

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let center = plates.get(x, y);
            let crosses = plates.get(x - 1, y) != center
                || plates.get(x + 1, y) != center
                || plates.get(x, y - 1) != center
                || plates.get(x, y + 1) != center;
            if crosses {
                cells.push((x, y));
            }
        }
    }
    cells
}

/// Adds ridged noise scaled by `mountain_scale` at every boundary cell,
/// then softens the whole grid with a radius-2 blur.
///
/// # Returns
/// The number of boundary cells raised
pub fn apply_ridges(
    elevation: &mut Heightmap,
    plates: &PlateMap,
    noise: &PerlinNoise,
    mountain_scale: f32,
) -> usize {
    let layer = FractalNoiseConfig::ridges();
    let w = elevation.width() as f64;
    let h = elevation.height() as f64;
    let cells = boundary_cells(plates);

    for &(x, y) in &cells {
        let nx = x as f64 / w;
        let ny = y as f64 / h;
        let ridge = layer.sample_ridged(noise, nx, ny);
        *elevation.get_mut(x, y) += ridge as f32 * mountain_scale;
    }

    elevation.blur(2);
    cells.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tectonics::{CrustType, TectonicPlate};
    use glam::Vec2;

    fn two_plate_map() -> PlateMap {
        let plates = vec![
            TectonicPlate {
                center: Vec2::new(4.0, 8.0),
                drift: Vec2::ZERO,
                crust_type: CrustType::Oceanic,
            },
            TectonicPlate {
                center: Vec2::new(12.0, 8.0),
                drift: Vec2::ZERO,
                crust_type: CrustType::Continental,
            },
        ];
        PlateMap::assign(&plates, 16, 16)
    }

    #[test]
    fn test_boundary_cells_follow_plate_edge() {
        let map = two_plate_map();
        let cells = boundary_cells(&map);
        // Column 8 ties between the centers and goes to plate 0, so the
        // split runs between columns 8 and 9. The wrap seam sits on the border.
        assert_eq!(cells.len(), 2 * 14);
        for &(x, y) in &cells {
            assert!(x == 8 || x == 9, "unexpected boundary cell ({}, {})", x, y);
            assert!((1..15).contains(&y));
        }
    }

    #[test]
    fn test_single_plate_has_no_boundaries() {
        let plates = vec![TectonicPlate {
            center: Vec2::new(3.0, 3.0),
            drift: Vec2::ZERO,
            crust_type: CrustType::Oceanic,
        }];
        let map = PlateMap::assign(&plates, 8, 8);
        assert!(boundary_cells(&map).is_empty());
    }

    #[test]
    fn test_ridges_raise_boundary() {
        let map = two_plate_map();
        let noise = PerlinNoise::new(11);
        let mut elevation = Heightmap::new(16, 16, 0.5);
        let raised = apply_ridges(&mut elevation, &map, &noise, 0.3);
        assert_eq!(raised, 28);
        assert!(elevation.get(8, 8) > elevation.get(1, 8));
        assert!(elevation.as_slice().iter().all(|&v| v >= 0.5 - 1e-6));
    }

    #[test]
    fn test_zero_scale_only_blurs() {
        let map = two_plate_map();
        let noise = PerlinNoise::new(11);
        let mut elevation = Heightmap::new(16, 16, 0.5);
        apply_ridges(&mut elevation, &map, &noise, 0.0);
        assert!(elevation.as_slice().iter().all(|&v| (v - 0.5).abs() < 1e-6));
    }
}
