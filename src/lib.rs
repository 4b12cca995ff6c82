mod config;
mod distance;
mod error;
mod grid;
mod index;
pub mod keyer;
mod linear;
mod monitor;

pub use config::Config;
pub use error::{Error, Result};
pub use grid::{GridStats, Insertion, ProximityGrid};
pub use index::ProximityIndex;
pub use keyer::CellId;
pub use linear::LinearScan;
pub use monitor::{Action, Monitor, Reading};

/// A point in 3D space.
pub type Point = [f64; 3];

/// Minimum separation distance used by `Default` implementations.
pub const DEFAULT_MIN_DISTANCE: f64 = 8.0;

fn validate_min_distance(min_distance: f64) -> Result<()> {
    if min_distance.is_finite() && min_distance > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration(format!(
            "min distance must be finite and positive, got {min_distance}"
        )))
    }
}
