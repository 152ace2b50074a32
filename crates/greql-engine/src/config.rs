//! Search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EvaluationError, Result};

/// Limits applied to every search.
///
/// All limits are off by default.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use greql_engine::Config;
///
/// let config = Config::default()
///     .with_max_markers(1_000_000)
///     .with_time_limit(Duration::from_secs(5));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of pending `(vertex, state)` pairs.
    pub max_queue_len: Option<usize>,

    /// Maximum number of visited `(vertex, state)` pairs.
    pub max_markers: Option<usize>,

    /// Maximum wall-clock time of one search.
    pub time_limit: Option<Duration>,
}

impl Config {
    /// Creates a configuration without limits.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Sets the queue length limit.
    #[must_use]
    pub fn with_max_queue_len(mut self, limit: usize) -> Self {
        self.max_queue_len = Some(limit);
        self
    }

    /// Sets the marker count limit.
    #[must_use]
    pub fn with_max_markers(mut self, limit: usize) -> Self {
        self.max_markers = Some(limit);
        self
    }

    /// Sets the time limit.
    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Returns `true` if no limit is set.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.max_queue_len.is_none() && self.max_markers.is_none() && self.time_limit.is_none()
    }

    /// Checks the limits.
    ///
    /// # Errors
    ///
    /// A limit of zero can never be met and is rejected.
    pub fn validate(&self) -> Result<()> {
        if self.max_queue_len == Some(0) {
            return Err(EvaluationError::InvalidConfig("max_queue_len must be positive".into()));
        }
        if self.max_markers == Some(0) {
            return Err(EvaluationError::InvalidConfig("max_markers must be positive".into()));
        }
        if self.time_limit == Some(Duration::ZERO) {
            return Err(EvaluationError::InvalidConfig("time_limit must be positive".into()));
        }
        Ok(())
    }
}
