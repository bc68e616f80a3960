//! Bootstrap configuration and its construction-time validation.

use crate::domain::ConfigError;
use std::time::Duration;
use tracing::warn;

/// Hard bootstrap periods below this cause reconnect churn against the host.
pub const RECOMMENDED_MIN_HARD_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for the bootstrap service.
///
/// # Invariants (checked by [`validate`](Self::validate))
///
/// - `min_peers > 0`
/// - `min_peers <= seed_addresses.len()`
/// - both intervals non-zero
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Seed peer address strings, resolved once at construction.
    pub seed_addresses: Vec<String>,
    /// Minimum number of connected peers to maintain.
    pub min_peers: usize,
    /// Soft timer period (listen-address delta check).
    pub bootstrap_interval: Duration,
    /// Hard timer period (unconditional reconnect).
    pub hard_bootstrap_interval: Duration,
    /// Deadline for each dial issued by the service itself
    /// (initial sweep and timer sweeps). `None` means no deadline.
    pub dial_timeout: Option<Duration>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            seed_addresses: Vec::new(),
            min_peers: 4,
            bootstrap_interval: Duration::from_secs(5),
            hard_bootstrap_interval: Duration::from_secs(90),
            dial_timeout: None,
        }
    }
}

impl BootstrapConfig {
    /// Config with the given seeds and minimum peer count, defaults elsewhere.
    pub fn new(seed_addresses: Vec<String>, min_peers: usize) -> Self {
        Self {
            seed_addresses,
            min_peers,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_bootstrap_interval(mut self, interval: Duration) -> Self {
        self.bootstrap_interval = interval;
        self
    }

    #[must_use]
    pub fn with_hard_bootstrap_interval(mut self, interval: Duration) -> Self {
        self.hard_bootstrap_interval = interval;
        self
    }

    #[must_use]
    pub fn with_dial_timeout(mut self, timeout: Duration) -> Self {
        self.dial_timeout = Some(timeout);
        self
    }

    /// Check the structural invariants.
    ///
    /// A hard interval shorter than [`RECOMMENDED_MIN_HARD_INTERVAL`] or not
    /// longer than the soft interval is legal but logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_peers == 0 {
            return Err(ConfigError::ZeroMinPeers);
        }
        if self.min_peers > self.seed_addresses.len() {
            return Err(ConfigError::TooFewSeeds {
                min_peers: self.min_peers,
                seeds: self.seed_addresses.len(),
            });
        }
        if self.bootstrap_interval.is_zero() {
            return Err(ConfigError::ZeroInterval {
                name: "bootstrap_interval",
            });
        }
        if self.hard_bootstrap_interval.is_zero() {
            return Err(ConfigError::ZeroInterval {
                name: "hard_bootstrap_interval",
            });
        }

        if self.hard_bootstrap_interval <= self.bootstrap_interval {
            warn!(
                soft = ?self.bootstrap_interval,
                hard = ?self.hard_bootstrap_interval,
                "Hard bootstrap interval does not exceed the soft interval"
            );
        } else if self.hard_bootstrap_interval < RECOMMENDED_MIN_HARD_INTERVAL {
            warn!(
                hard = ?self.hard_bootstrap_interval,
                "Hard bootstrap interval below 60s may cause reconnect churn"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeds(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("seed-{i}")).collect()
    }

    #[test]
    fn test_default_config_values() {
        let config = BootstrapConfig::default();
        assert_eq!(config.min_peers, 4);
        assert_eq!(config.bootstrap_interval, Duration::from_secs(5));
        assert_eq!(config.hard_bootstrap_interval, Duration::from_secs(90));
        assert!(config.dial_timeout.is_none());
    }

    #[test]
    fn test_min_peers_above_seed_count_rejected() {
        let config = BootstrapConfig::new(seeds(2), 3);
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooFewSeeds {
                min_peers: 3,
                seeds: 2
            })
        );
    }

    #[test]
    fn test_min_peers_equal_to_seed_count_accepted() {
        assert!(BootstrapConfig::new(seeds(3), 3).validate().is_ok());
    }

    #[test]
    fn test_zero_min_peers_rejected() {
        assert_eq!(
            BootstrapConfig::new(seeds(1), 0).validate(),
            Err(ConfigError::ZeroMinPeers)
        );
    }

    #[test]
    fn test_zero_intervals_rejected() {
        let soft = BootstrapConfig::new(seeds(1), 1).with_bootstrap_interval(Duration::ZERO);
        assert_eq!(
            soft.validate(),
            Err(ConfigError::ZeroInterval {
                name: "bootstrap_interval"
            })
        );

        let hard = BootstrapConfig::new(seeds(1), 1).with_hard_bootstrap_interval(Duration::ZERO);
        assert_eq!(
            hard.validate(),
            Err(ConfigError::ZeroInterval {
                name: "hard_bootstrap_interval"
            })
        );
    }

    #[test]
    fn test_huge_intervals_accepted() {
        let config = BootstrapConfig::new(seeds(1), 1)
            .with_bootstrap_interval(Duration::MAX)
            .with_hard_bootstrap_interval(Duration::from_secs(u64::MAX));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_hard_interval_only_warns() {
        let config = BootstrapConfig::new(seeds(1), 1)
            .with_bootstrap_interval(Duration::from_secs(10))
            .with_hard_bootstrap_interval(Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }
}
