use crate::{
    distance::euclidean,
    error::{Error, Result},
    index::ProximityIndex,
    validate_min_distance, Point,
};

/// Brute-force baseline: compares every new point against all stored ones.
///
/// Each earlier point within the minimum distance is counted once.
pub struct LinearScan {
    min_distance: f64,
    data: Vec<Point>,
}

impl LinearScan {
    /// # Errors
    /// `InvalidConfiguration` unless `min_distance` is finite and positive.
    pub fn new(min_distance: f64) -> Result<Self> {
        validate_min_distance(min_distance)?;
        Ok(Self {
            min_distance,
            data: Vec::new(),
        })
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.data
    }
}

impl ProximityIndex for LinearScan {
    fn insert(&mut self, point: Point) -> Result<usize> {
        if point.iter().any(|c| !c.is_finite()) {
            return Err(Error::InvalidPoint(point));
        }
        let violations = self
            .data
            .iter()
            .filter(|other| euclidean(other, &point) < self.min_distance)
            .count();
        self.data.push(point);
        Ok(violations)
    }

    fn reset(&mut self) {
        self.data.clear();
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::LinearScan;
    use crate::ProximityIndex;

    #[test]
    fn counts_each_point_once() {
        let mut scan = LinearScan::new(8.0).unwrap();
        assert_eq!(scan.insert([0.0, 0.0, 0.0]), Ok(0));
        assert_eq!(scan.insert([0.0, 0.0, 0.0]), Ok(1));
        assert_eq!(scan.insert([7.0, 0.0, 0.0]), Ok(2));
        assert_eq!(scan.insert([15.0, 0.0, 0.0]), Ok(1));
        assert_eq!(scan.len(), 4);

        scan.reset();
        assert!(scan.is_empty());
    }

    #[test]
    fn invalid_min_distance() {
        assert!(LinearScan::new(0.0).is_err());
        assert!(LinearScan::new(-1.0).is_err());
    }
}
