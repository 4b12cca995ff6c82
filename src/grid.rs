use crate::{
    distance::euclidean,
    error::Result,
    index::ProximityIndex,
    keyer::{self, CellId},
    validate_min_distance, Point,
};
use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

/// Outcome of a single insertion.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Insertion {
    /// Number of (cell, earlier point) hits closer than the minimum distance.
    pub violations: usize,
    /// Smallest violating distance among the points that were checked.
    pub nearest: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridStats {
    pub points: usize,
    pub cells: usize,
    pub entries: usize,
    pub largest_bucket: usize,
    pub mean_bucket_len: f64,
}

/// Uniform grid whose cell size equals the minimum separation distance.
///
/// Every point is filed under the 8 cells produced by [`keyer::cell_ids`], so
/// that a later point only has to look at its own cells, plus the probe-only
/// bridge cells of [`keyer::bridge_ids`], to find every earlier point that
/// could be closer than the minimum distance.
///
/// A stored point reachable through several of the cells a new point looks
/// at is counted once per shared cell. Two identical points therefore report
/// 8 violations, not 1.
pub struct ProximityGrid {
    min_distance: f64,
    num_points: usize,
    cells: FxHashMap<CellId, Vec<Point>>,
}

impl ProximityGrid {
    /// # Errors
    /// `InvalidConfiguration` unless `min_distance` is finite and positive.
    pub fn new(min_distance: f64) -> Result<Self> {
        validate_min_distance(min_distance)?;
        log::debug!("proximity grid created with min distance {min_distance}");
        Ok(ProximityGrid {
            min_distance,
            num_points: 0,
            cells: FxHashMap::default(),
        })
    }

    #[must_use]
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Inserts `point` and returns the number of violations found.
    ///
    /// # Errors
    /// `InvalidPoint` or `OutOfRange`; the grid is left untouched.
    pub fn insert(&mut self, point: Point) -> Result<usize> {
        self.insert_detailed(point).map(|insertion| insertion.violations)
    }

    /// Like [`ProximityGrid::insert`], also reporting the closest violation.
    ///
    /// # Errors
    /// `InvalidPoint` or `OutOfRange`; the grid is left untouched.
    pub fn insert_detailed(&mut self, point: Point) -> Result<Insertion> {
        let keys = keyer::keys(&point, self.min_distance).map_err(|err| {
            log::warn!("rejected point {point:?}: {err}");
            err
        })?;

        let mut insertion = Insertion::default();
        for id in keys.bridges() {
            if let Some(bucket) = self.cells.get(&id) {
                Self::check(self.min_distance, &point, bucket, &mut insertion);
            }
        }
        for id in keys.filing() {
            let bucket = self.cells.entry(id).or_default();
            Self::check(self.min_distance, &point, bucket, &mut insertion);
            bucket.push(point);
        }
        self.num_points += 1;

        log::trace!(
            "inserted {point:?}: {} violations, nearest {:?}",
            insertion.violations,
            insertion.nearest
        );
        Ok(insertion)
    }

    // Distance checks happen before the new point is appended, so it never
    // meets itself.
    fn check(min_distance: f64, point: &Point, bucket: &[Point], insertion: &mut Insertion) {
        for other in bucket {
            let distance = euclidean(point, other);
            if distance < min_distance {
                insertion.violations += 1;
                insertion.nearest = Some(insertion.nearest.map_or(distance, |nearest| {
                    OrderedFloat(nearest).min(OrderedFloat(distance)).into_inner()
                }));
            }
        }
    }

    /// Removes every point, keeping the minimum distance.
    pub fn reset(&mut self) {
        log::debug!(
            "resetting proximity grid ({} points, {} cells)",
            self.num_points,
            self.cells.len()
        );
        self.cells.clear();
        self.num_points = 0;
    }

    /// Number of points inserted since creation or the last reset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.num_points
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_points == 0
    }

    #[must_use]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn bucket(&self, id: &CellId) -> Option<&[Point]> {
        self.cells.get(id).map(Vec::as_slice)
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> GridStats {
        let entries: usize = self.cells.values().map(Vec::len).sum();
        let largest_bucket = self.cells.values().map(Vec::len).max().unwrap_or(0);
        let mean_bucket_len = if self.cells.is_empty() {
            0.0
        } else {
            entries as f64 / self.cells.len() as f64
        };
        GridStats {
            points: self.num_points,
            cells: self.cells.len(),
            entries,
            largest_bucket,
            mean_bucket_len,
        }
    }
}

impl Default for ProximityGrid {
    fn default() -> Self {
        ProximityGrid::new(crate::DEFAULT_MIN_DISTANCE).expect("Invalid min distance")
    }
}

impl ProximityIndex for ProximityGrid {
    fn insert(&mut self, point: Point) -> Result<usize> {
        ProximityGrid::insert(self, point)
    }

    fn reset(&mut self) {
        ProximityGrid::reset(self);
    }

    fn len(&self) -> usize {
        ProximityGrid::len(self)
    }
}

#[cfg(test)]
mod tests {
    use super::ProximityGrid;
    use crate::{keyer::cell_ids, Error};

    #[test]
    fn first_insert_is_clean() {
        let mut grid = ProximityGrid::default();
        assert_eq!(grid.insert([3.0, -2.0, 11.0]), Ok(0));
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.num_cells(), 8);
    }

    #[test]
    fn filed_under_eight_cells() {
        let mut grid = ProximityGrid::new(8.0).unwrap();
        let point = [10.0, 11.0, -3.0];
        grid.insert(point).unwrap();
        for id in cell_ids(&point, 8.0).unwrap() {
            assert_eq!(grid.bucket(&id), Some(&[point][..]));
        }

        let stats = grid.stats();
        assert_eq!(stats.points, 1);
        assert_eq!(stats.entries, 8);
        assert_eq!(stats.largest_bucket, 1);
        assert_eq!(stats.mean_bucket_len, 1.0);
    }

    #[test]
    fn bucket_keeps_insertion_order() {
        let mut grid = ProximityGrid::new(8.0).unwrap();
        let a = [1.0, 1.0, 1.0];
        let b = [2.0, 2.0, 2.0];
        grid.insert(a).unwrap();
        grid.insert(b).unwrap();
        let id = cell_ids(&a, 8.0).unwrap()[0];
        assert_eq!(grid.bucket(&id), Some(&[a, b][..]));
    }

    #[test]
    fn double_counting() {
        let mut grid = ProximityGrid::new(8.0).unwrap();

        // Both points are filed under the same 8 cells
        grid.insert([1.0, 1.0, 1.0]).unwrap();
        assert_eq!(grid.insert([2.0, 2.0, 2.0]), Ok(8));

        // A duplicate hits both earlier points in all 8 cells
        assert_eq!(grid.insert([2.0, 2.0, 2.0]), Ok(16));
    }

    #[test]
    fn on_grid_and_off_grid_meet() {
        let mut grid = ProximityGrid::new(8.0).unwrap();
        grid.insert([0.0, 0.0, 0.0]).unwrap();

        // Found through the 4 bridge cells at x = 4
        let insertion = grid.insert_detailed([7.0, 0.0, 0.0]).unwrap();
        assert_eq!(insertion.violations, 4);
        assert_eq!(insertion.nearest, Some(7.0));
    }

    #[test]
    fn nearest_violation() {
        let mut grid = ProximityGrid::new(8.0).unwrap();
        grid.insert([1.0, 1.0, 1.0]).unwrap();
        grid.insert([5.0, 1.0, 1.0]).unwrap();
        let insertion = grid.insert_detailed([2.0, 1.0, 1.0]).unwrap();
        assert_eq!(insertion.nearest, Some(1.0));

        let insertion = grid.insert_detailed([40.0, 40.0, 40.0]).unwrap();
        assert_eq!(insertion.violations, 0);
        assert_eq!(insertion.nearest, None);
    }

    #[test]
    fn rejected_point_leaves_grid_untouched() {
        let mut grid = ProximityGrid::new(8.0).unwrap();
        grid.insert([0.0, 0.0, 0.0]).unwrap();
        let result = grid.insert([f64::NEG_INFINITY, 0.0, 0.0]);
        assert!(matches!(result, Err(Error::InvalidPoint(_))));
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.num_cells(), 8);
        assert_eq!(grid.stats().entries, 8);
    }

    #[test]
    fn out_of_range_leaves_grid_untouched() {
        let mut grid = ProximityGrid::new(8.0).unwrap();
        grid.insert([1.0, 2.0, 3.0]).unwrap();

        // The grid index of this coordinate is exactly i64::MIN
        let result = grid.insert([-(2f64.powi(63)) * 8.0, 0.0, 0.0]);
        assert!(matches!(result, Err(Error::OutOfRange { .. })));
        assert!(grid.insert([0.0, 2f64.powi(63) * 8.0, 0.0]).is_err());
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.num_cells(), 8);
        assert_eq!(grid.stats().entries, 8);
    }

    #[test]
    fn reset() {
        let mut grid = ProximityGrid::new(8.0).unwrap();
        grid.insert([0.0, 0.0, 0.0]).unwrap();
        grid.insert([1.0, 0.0, 0.0]).unwrap();
        grid.reset();
        assert!(grid.is_empty());
        assert_eq!(grid.num_cells(), 0);
        assert_eq!(grid.insert([0.0, 0.0, 0.0]), Ok(0));
        assert_eq!(grid.min_distance(), 8.0);
    }

    #[test]
    fn invalid_min_distance() {
        for min_distance in [0.0, -8.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ProximityGrid::new(min_distance),
                Err(Error::InvalidConfiguration(_))
            ));
        }
    }
}
