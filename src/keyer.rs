use crate::error::{Error, Result};
use crate::{validate_min_distance, Point};
use conv::{ApproxFrom, RoundToNearest};

// Keeps every half-cell key and its neighbours representable in an i64.
const MAX_GRID_INDEX: i64 = i64::MAX / 4;

/// Identifier of one cell of the uniform grid.
///
/// Coordinates are stored in half-cell units (`cell_size / 2`): grid lines
/// land on even values and the `cell_size / 2` offsets used for coordinates
/// lying exactly on a grid line land on odd values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl CellId {
    #[must_use]
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        CellId { x, y, z }
    }

    /// Real-valued position of this identifier for the given cell size.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn corner(&self, cell_size: f64) -> Point {
        let half = cell_size / 2.0;
        [
            self.x as f64 * half,
            self.y as f64 * half,
            self.z as f64 * half,
        ]
    }
}

/// Keys produced for a single axis, in half-cell units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisKeys {
    /// The two cells a point is filed under along this axis.
    pub filing: [i64; 2],
    /// Probe-only key joining the on-grid and off-grid families.
    pub bridge: i64,
}

impl AxisKeys {
    fn choice(&self, i: usize) -> i64 {
        if i < 2 {
            self.filing[i]
        } else {
            self.bridge
        }
    }
}

/// Per-axis keys of one point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keys {
    axes: [AxisKeys; 3],
}

impl Keys {
    /// The 8 cells a point is filed under, x-major.
    #[must_use]
    pub fn filing(&self) -> [CellId; 8] {
        let [x, y, z] = &self.axes;
        let mut ids = [CellId::default(); 8];
        for (i, id) in ids.iter_mut().enumerate() {
            *id = CellId::new(x.filing[(i >> 2) & 1], y.filing[(i >> 1) & 1], z.filing[i & 1]);
        }
        ids
    }

    /// Every key combination that uses at least one bridge key, x-major.
    #[must_use]
    pub fn bridges(&self) -> [CellId; 19] {
        let [x, y, z] = &self.axes;
        let mut ids = [CellId::default(); 19];
        let mut n = 0;
        for a in 0..3 {
            for b in 0..3 {
                for c in 0..3 {
                    if a < 2 && b < 2 && c < 2 {
                        continue;
                    }
                    ids[n] = CellId::new(x.choice(a), y.choice(b), z.choice(c));
                    n += 1;
                }
            }
        }
        ids
    }
}

/// Computes the keys of `point` for a grid of `cell_size`.
///
/// # Errors
/// `InvalidConfiguration` unless `cell_size` is finite and positive,
/// `InvalidPoint` for a non-finite coordinate, `OutOfRange` when a coordinate
/// is too far from the origin to be keyed.
pub fn keys(point: &Point, cell_size: f64) -> Result<Keys> {
    validate_min_distance(cell_size)?;
    if point.iter().any(|c| !c.is_finite()) {
        return Err(Error::InvalidPoint(*point));
    }
    Ok(Keys {
        axes: [
            axis_keys(point[0], cell_size)?,
            axis_keys(point[1], cell_size)?,
            axis_keys(point[2], cell_size)?,
        ],
    })
}

/// The 8 cells `point` is filed under.
///
/// # Errors
/// See [`keys`].
pub fn cell_ids(point: &Point, cell_size: f64) -> Result<[CellId; 8]> {
    keys(point, cell_size).map(|keys| keys.filing())
}

/// The 19 probe-only cells of `point`.
///
/// # Errors
/// See [`keys`].
pub fn bridge_ids(point: &Point, cell_size: f64) -> Result<[CellId; 19]> {
    keys(point, cell_size).map(|keys| keys.bridges())
}

/// Keys of a single coordinate.
///
/// A coordinate on a grid line `q` is filed half a cell to either side of it
/// and bridges at `q`. Any other coordinate is filed at its rounded grid line
/// and at the grid line on the far side of the coordinate, and bridges at
/// the midpoint between the two.
///
/// # Errors
/// `InvalidConfiguration` for a bad `cell_size`, `OutOfRange` when the grid
/// index does not fit the key space.
pub fn axis_keys(r: f64, cell_size: f64) -> Result<AxisKeys> {
    let (truncated, rem) = split(r, cell_size)?;
    let q = truncated * 2;
    if rem == 0.0 {
        return Ok(AxisKeys {
            filing: [q + 1, q - 1],
            bridge: q,
        });
    }

    let away = if r < 0.0 { truncated - 1 } else { truncated + 1 };
    let (rounded, other) = if (rem / cell_size).abs() < 0.5 {
        (truncated, away)
    } else {
        (away, truncated)
    };
    Ok(AxisKeys {
        filing: [rounded * 2, other * 2],
        bridge: rounded + other,
    })
}

/// Rounds `r` to the index of the nearest grid line, so that the grid line
/// itself is `index * cell_size`. Halfway values round away from zero.
///
/// # Errors
/// `InvalidConfiguration` for a bad `cell_size`, `OutOfRange` when the index
/// does not fit the key space.
pub fn round_to_grid(r: f64, cell_size: f64) -> Result<i64> {
    let (truncated, rem) = split(r, cell_size)?;
    if (rem / cell_size).abs() < 0.5 {
        Ok(truncated)
    } else if r < 0.0 {
        Ok(truncated - 1)
    } else {
        Ok(truncated + 1)
    }
}

// Splits `r` into the grid index truncated toward zero and the remainder,
// which carries the sign of `r`.
fn split(r: f64, cell_size: f64) -> Result<(i64, f64)> {
    validate_min_distance(cell_size)?;
    let out_of_range = || Error::OutOfRange {
        coordinate: r,
        cell_size,
    };
    let rem = r % cell_size;
    let index = <i64 as ApproxFrom<f64, RoundToNearest>>::approx_from((r - rem) / cell_size)
        .map_err(|_| out_of_range())?;
    if index.unsigned_abs() > MAX_GRID_INDEX.unsigned_abs() {
        return Err(out_of_range());
    }
    Ok((index, rem))
}
