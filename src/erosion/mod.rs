//! Hydraulic erosion.
//!
//! Simulated raindrops pick up sediment while running downhill and drop it
//! when they slow down or climb, carving valleys into the elevation grid.

mod config;
pub mod hydraulic;

pub use config::ErosionConfig;
pub use hydraulic::{erode, ErosionStats, Termination};
