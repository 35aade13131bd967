//! Wake schedules
//!
//! Rebalancing agents wake on a fixed period; buy-and-hold wakes after a
//! short random delay. The random variant draws from a seeded RNG so a
//! simulation replays identically.

use ballast_core::Timestamp;
use chrono::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// How long an agent sleeps between cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WakeConfig {
    Fixed { interval_ns: i64 },
    /// Uniform over `[min_ns, max_ns]`
    Random { min_ns: i64, max_ns: i64 },
}

impl WakeConfig {
    pub fn every_seconds(seconds: i64) -> Self {
        WakeConfig::Fixed {
            interval_ns: seconds * NANOS_PER_SECOND,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match *self {
            WakeConfig::Fixed { interval_ns } if interval_ns <= 0 => {
                Err(format!("wake interval must be positive, got {}ns", interval_ns))
            }
            WakeConfig::Random { min_ns, max_ns } if min_ns < 0 || max_ns < min_ns => Err(
                format!("invalid random wake range [{}, {}]ns", min_ns, max_ns),
            ),
            _ => Ok(()),
        }
    }
}

/// Draws successive wake intervals
#[derive(Debug, Clone)]
pub struct WakeSchedule {
    config: WakeConfig,
    rng: StdRng,
}

impl WakeSchedule {
    pub fn new(config: WakeConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> WakeConfig {
        self.config
    }

    pub fn next_interval(&mut self) -> Duration {
        match self.config {
            WakeConfig::Fixed { interval_ns } => Duration::nanoseconds(interval_ns),
            WakeConfig::Random { min_ns, max_ns } => {
                Duration::nanoseconds(self.rng.gen_range(min_ns..=max_ns))
            }
        }
    }

    pub fn next_wakeup(&mut self, now: Timestamp) -> Timestamp {
        now + self.next_interval()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_interval() {
        let mut schedule = WakeSchedule::new(WakeConfig::every_seconds(60), 7);
        assert_eq!(schedule.next_interval(), Duration::seconds(60));
        assert_eq!(schedule.next_interval(), Duration::seconds(60));
    }

    #[test]
    fn test_random_interval_in_range_and_seeded() {
        let config = WakeConfig::Random {
            min_ns: 0,
            max_ns: 100,
        };
        let mut a = WakeSchedule::new(config, 42);
        let mut b = WakeSchedule::new(config, 42);

        for _ in 0..50 {
            let interval = a.next_interval();
            assert!(interval >= Duration::zero() && interval <= Duration::nanoseconds(100));
            assert_eq!(interval, b.next_interval());
        }
    }

    #[test]
    fn test_validate() {
        assert!(WakeConfig::every_seconds(40).validate().is_ok());
        assert!(WakeConfig::Fixed { interval_ns: 0 }.validate().is_err());
        assert!(
            WakeConfig::Random {
                min_ns: 10,
                max_ns: 5
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_parse() {
        let config: WakeConfig =
            serde_json::from_str(r#"{"kind": "fixed", "interval_ns": 40000000000}"#).unwrap();
        assert_eq!(config, WakeConfig::every_seconds(40));
    }
}
