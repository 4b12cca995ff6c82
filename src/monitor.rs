use crate::{config::Config, error::Result, grid::ProximityGrid, Point};

/// What the caller should do about a reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    Buzz,
    NoBuzz,
}

impl Action {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buzz => "buzz",
            Action::NoBuzz => "no_buzz",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub point: Point,
    pub violations: usize,
    pub action: Action,
}

/// Feeds readings into a [`ProximityGrid`] and keeps their history.
pub struct Monitor {
    config: Config,
    grid: ProximityGrid,
    history: Vec<Reading>,
}

impl Monitor {
    /// # Errors
    /// `InvalidConfiguration` when `config` does not validate.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Monitor {
            config,
            grid: ProximityGrid::new(config.min_distance)?,
            history: Vec::new(),
        })
    }

    /// Records `point` and decides whether it is too close to earlier ones.
    ///
    /// # Errors
    /// Rejected points are not recorded.
    pub fn record(&mut self, point: Point) -> Result<Action> {
        let violations = self.grid.insert(point)?;
        let action = if violations >= self.config.alert_threshold {
            Action::Buzz
        } else {
            Action::NoBuzz
        };
        self.history.push(Reading {
            point,
            violations,
            action,
        });
        Ok(action)
    }

    #[must_use]
    pub fn history(&self) -> &[Reading] {
        &self.history
    }

    #[must_use]
    pub fn total_violations(&self) -> usize {
        self.history.iter().map(|reading| reading.violations).sum()
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &ProximityGrid {
        &self.grid
    }

    /// Forgets every reading.
    pub fn clear(&mut self) {
        self.grid.reset();
        self.history.clear();
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Monitor::new(Config::default()).expect("Invalid default config")
    }
}
