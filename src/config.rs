use crate::{error::Result, validate_min_distance, DEFAULT_MIN_DISTANCE};

/// Settings of a [`crate::Monitor`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Minimum separation distance, also the grid cell size.
    pub min_distance: f64,
    /// Violation count at or above which a reading triggers a buzz.
    pub alert_threshold: usize,
}

impl Config {
    #[must_use]
    pub fn new(min_distance: f64) -> Self {
        Config {
            min_distance,
            ..Config::default()
        }
    }

    #[must_use]
    pub fn with_alert_threshold(mut self, alert_threshold: usize) -> Self {
        self.alert_threshold = alert_threshold;
        self
    }

    /// # Errors
    /// `InvalidConfiguration` for a non-positive distance or a zero threshold.
    pub fn validate(&self) -> Result<()> {
        validate_min_distance(self.min_distance)?;
        if self.alert_threshold == 0 {
            return Err(crate::Error::InvalidConfiguration(
                "alert threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_distance: DEFAULT_MIN_DISTANCE,
            alert_threshold: 1,
        }
    }
}
