//! Configuration for the store's background maintenance.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default interval between compaction sweeps.
pub const DEFAULT_COMPACTION_INTERVAL: Duration = Duration::from_secs(60);

/// Default number of newest revisions kept per key.
pub const DEFAULT_COMPACTION_RETENTION: usize = 2;

/// Retention compaction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactionConfig {
    /// Time between sweeps.
    #[serde(with = "duration_secs")]
    pub interval: Duration,
    /// Revisions kept per key after a sweep.
    pub retention: usize,
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_COMPACTION_INTERVAL,
            retention: DEFAULT_COMPACTION_RETENTION,
        }
    }
}

impl CompactionConfig {
    /// Set the sweep interval (minimum 1 second).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_secs(1));
        self
    }

    /// Set the per-key retention (minimum 1).
    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention.max(1);
        self
    }

    /// Apply environment overrides.
    ///
    /// Reads:
    /// - `REVDB_COMPACTION_INTERVAL_SECS` (default: 60)
    /// - `REVDB_COMPACTION_RETENTION` (default: 2)
    ///
    /// Unparseable values are ignored.
    pub fn merge_env(mut self) -> Self {
        if let Ok(secs) = std::env::var("REVDB_COMPACTION_INTERVAL_SECS") {
            if let Ok(secs) = secs.parse() {
                self = self.with_interval(Duration::from_secs(secs));
            }
        }

        if let Ok(retention) = std::env::var("REVDB_COMPACTION_RETENTION") {
            if let Ok(retention) = retention.parse() {
                self = self.with_retention(retention);
            }
        }

        self
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
