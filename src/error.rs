use crate::Point;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A coordinate was NaN or infinite.
    #[error("Invalid point: {0:?} has a non-finite coordinate")]
    InvalidPoint(Point),

    /// The minimum separation distance must be finite and strictly positive.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The grid index of a coordinate does not fit the integer key space.
    #[error("Coordinate {coordinate} is out of range for cell size {cell_size}")]
    OutOfRange { coordinate: f64, cell_size: f64 },
}
