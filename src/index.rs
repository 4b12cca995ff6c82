use crate::{error::Result, Point};

/// Incremental minimum-separation check over a growing set of points.
pub trait ProximityIndex {
    /// Adds `point` and returns how many earlier points it violates.
    ///
    /// # Errors
    /// Rejects the point without modifying the index.
    fn insert(&mut self, point: Point) -> Result<usize>;
    fn reset(&mut self);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
