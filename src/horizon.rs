//! The scheduling horizon: an ordered run of hourly periods.
//!
//! Periods are numbered from 1, matching the hour labels used in profile
//! input files. The first period has no predecessor, which is what exempts
//! it from ramp and state-transition coupling.
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The number of periods in the default day-ahead horizon.
pub const DEFAULT_PERIODS: usize = 24;

/// A single hourly period, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hour(pub usize);

impl Hour {
    /// The period immediately before this one, if there is one.
    pub fn previous(self) -> Option<Hour> {
        if self.0 > 1 {
            Some(Hour(self.0 - 1))
        } else {
            None
        }
    }

    /// Zero-based position of this period within the horizon.
    pub fn index(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The ordered set of hourly periods a schedule covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    periods: usize,
}

impl Default for Horizon {
    fn default() -> Self {
        Self {
            periods: DEFAULT_PERIODS,
        }
    }
}

impl Horizon {
    /// Create a horizon with the given number of hourly periods.
    pub fn new(periods: usize) -> Result<Self> {
        ensure!(periods > 0, "Horizon must contain at least one period");

        Ok(Self { periods })
    }

    /// The number of periods covered.
    pub fn periods(self) -> usize {
        self.periods
    }

    /// Iterate over all periods in order.
    pub fn iter(self) -> impl Iterator<Item = Hour> + Clone {
        (1..=self.periods).map(Hour)
    }

    /// The first period.
    pub fn first(self) -> Hour {
        Hour(1)
    }

    /// The last period.
    pub fn last(self) -> Hour {
        Hour(self.periods)
    }

    /// Whether `hour` falls within this horizon.
    pub fn contains(self, hour: Hour) -> bool {
        (1..=self.periods).contains(&hour.0)
    }
}
