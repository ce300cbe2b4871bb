//! Tectonic plate partition of the map.
//!
//! Plates are drawn from the random source, each cell is assigned to its
//! nearest plate center (wrapping in longitude), and ridged mountains are
//! raised wherever neighbouring cells belong to different plates.

mod plate;
mod voronoi;
pub mod ridge;

pub use plate::{generate_plates, CrustType, TectonicPlate, OCEANIC_PROBABILITY};
pub use ridge::{apply_ridges, boundary_cells};
pub use voronoi::{wrapped_dx, PlateMap};
