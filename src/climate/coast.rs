//! Distance-to-ocean field via multi-source breadth-first search.

use std::collections::VecDeque;

use log::warn;

use crate::terrain::Heightmap;

/// Step distance (4-connected, no wrap) from every cell to the nearest
/// cell below `sea_level`.
///
/// Ocean cells have distance 0. Returns `None` for a cell that no ocean
/// can reach, which only happens when the grid has no ocean at all.
pub fn ocean_distance(elevation: &Heightmap, sea_level: f32) -> Vec<Option<u32>> {
    let w = elevation.width() as usize;
    let h = elevation.height() as usize;
    let mut dist: Vec<Option<u32>> = vec![None; w * h];
    let mut queue: VecDeque<usize> = VecDeque::new();

    for (i, &e) in elevation.as_slice().iter().enumerate() {
        if e < sea_level {
            dist[i] = Some(0);
            queue.push_back(i);
        }
    }

    if queue.is_empty() && !dist.is_empty() {
        warn!("No ocean cells below sea level {:.3}; every cell is inland", sea_level);
    }

    while let Some(idx) = queue.pop_front() {
        let d = dist[idx].unwrap_or(0);
        let x = idx % w;
        let y = idx / w;

        let neighbours = [
            (x > 0).then(|| idx - 1),
            (x + 1 < w).then(|| idx + 1),
            (y > 0).then(|| idx - w),
            (y + 1 < h).then(|| idx + w),
        ];
        for n in neighbours.into_iter().flatten() {
            if dist[n].is_none() {
                dist[n] = Some(d + 1);
                queue.push_back(n);
            }
        }
    }

    dist
}
