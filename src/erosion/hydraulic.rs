//! Particle-based hydraulic erosion.
//!
//! Every particle start position is drawn up front from the random source,
//! then particles are simulated one after another in draw order. Particles
//! read and write the shared grid, so the simulation itself stays serial.

use glam::Vec2;

use crate::erosion::ErosionConfig;
use crate::random::RandomSource;
use crate::terrain::Heightmap;

/// Why a particle stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Ran for `max_lifetime` steps.
    Lifetime,
    /// Started or moved outside the grid interior.
    LeftInterior,
    /// Gradient and momentum cancelled out.
    Stalled,
}

/// Aggregate outcome of one erosion pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErosionStats {
    pub particles: u32,
    pub steps: u64,
    pub lifetime_exhausted: u32,
    pub left_interior: u32,
    pub stalled: u32,
    /// Total height removed from the surface.
    pub eroded: f64,
    /// Total height added back to the surface.
    pub deposited: f64,
}

impl ErosionStats {
    fn record(&mut self, termination: Termination) {
        match termination {
            Termination::Lifetime => self.lifetime_exhausted += 1,
            Termination::LeftInterior => self.left_interior += 1,
            Termination::Stalled => self.stalled += 1,
        }
    }
}

/// Draws `iterations` start positions uniformly over the interior.
pub fn spawn_particles(
    rng: &mut RandomSource,
    iterations: u32,
    width: u32,
    height: u32,
) -> Vec<Vec2> {
    let max_x = width as f32 - 2.0;
    let max_y = height as f32 - 2.0;
    (0..iterations)
        .map(|_| {
            let px = rng.next_float_range(1.0, max_x);
            let py = rng.next_float_range(1.0, max_y);
            Vec2::new(px, py)
        })
        .collect()
}

/// Runs `iterations` erosion particles over `elevation`.
pub fn erode(
    elevation: &mut Heightmap,
    rng: &mut RandomSource,
    iterations: u32,
    config: &ErosionConfig,
) -> ErosionStats {
    let starts = spawn_particles(rng, iterations, elevation.width(), elevation.height());
    let mut stats = ErosionStats::default();
    for start in starts {
        let termination = simulate_particle(elevation, start, config, &mut stats);
        stats.record(termination);
        stats.particles += 1;
    }
    stats
}

#[inline]
fn in_interior(p: Vec2, width: u32, height: u32) -> bool {
    let ix = p.x as u32;
    let iy = p.y as u32;
    ix >= 1 && ix + 1 < width && iy >= 1 && iy + 1 < height
}

/// Simulates a single particle starting at `start`.
pub fn simulate_particle(
    elevation: &mut Heightmap,
    start: Vec2,
    config: &ErosionConfig,
    stats: &mut ErosionStats,
) -> Termination {
    let w = elevation.width();
    let h = elevation.height();

    let mut pos = start;
    let mut dir = Vec2::ZERO;
    let mut sediment = 0.0f32;
    let mut speed = 0.0f32;
    let mut water = 1.0f32;

    for _ in 0..config.max_lifetime {
        if !in_interior(pos, w, h) {
            return Termination::LeftInterior;
        }
        let ix = pos.x as u32;
        let iy = pos.y as u32;

        // Central differences
        let gx = (elevation.get(ix + 1, iy) - elevation.get(ix - 1, iy)) * 0.5;
        let gy = (elevation.get(ix, iy + 1) - elevation.get(ix, iy - 1)) * 0.5;

        dir = dir * config.inertia - Vec2::new(gx, gy) * (1.0 - config.inertia);
        let len = dir.length();
        if len < 1e-6 {
            return Termination::Stalled;
        }
        dir /= len;

        let next = pos + dir;
        if !in_interior(next, w, h) {
            return Termination::LeftInterior;
        }
        stats.steps += 1;

        let h_cur = elevation.sample(pos.x, pos.y);
        let h_next = elevation.sample(next.x, next.y);
        let h_diff = h_next - h_cur;
        let cell = elevation.get_mut(ix, iy);

        // Every change moves the floor cell towards a sampled surface height,
        // so the grid's range never widens.
        if h_diff > 0.0 {
            // Uphill: fill the step with carried sediment.
            let deposit = sediment.min(h_diff).min((h_next - *cell).max(0.0));
            *cell += deposit;
            sediment -= deposit;
            stats.deposited += deposit as f64;
        } else {
            let capacity =
                (-h_diff).max(config.min_slope) * speed * water * config.capacity_factor;
            if sediment > capacity {
                let deposit =
                    ((sediment - capacity) * config.deposit_rate).min((h_cur - *cell).max(0.0));
                *cell += deposit;
                sediment -= deposit;
                stats.deposited += deposit as f64;
            } else {
                let erode = ((capacity - sediment) * config.erosion_rate)
                    .min(-h_diff)
                    .min((*cell - h_next).max(0.0));
                *cell -= erode;
                sediment += erode;
                stats.eroded += erode as f64;
            }
        }

        speed = (speed * speed + h_diff * config.gravity).max(0.0).sqrt();
        water *= 1.0 - config.evaporation;
        pos = next;
    }

    Termination::Lifetime
}
