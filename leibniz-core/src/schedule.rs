//! Schedule Policies
//!
//! A [`Schedule`] describes how the index range `[0, N)` is divided among
//! worker threads. It is validated once at construction so that
//! [`evaluate`](crate::evaluate) never has to re-check its inputs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use thiserror::Error;

/// Errors raised when a schedule or experiment is misconfigured
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// At least one worker thread is required
    #[error("thread count must be at least 1")]
    ZeroThreads,

    /// Chunk sizes are counted in indices and must be positive
    #[error("chunk size must be at least 1")]
    ZeroChunkSize,

    /// Every experiment needs at least one trial
    #[error("run count must be at least 1")]
    ZeroRuns,

    /// Schedule name not recognised
    #[error("unknown schedule policy: {0} (expected static, dynamic, guided or auto)")]
    UnknownPolicy(String),
}

/// Strategy for dividing the iteration space among workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulePolicy {
    /// Fixed blocks assigned up front
    Static,
    /// Fixed-size chunks pulled from a shared cursor
    Dynamic,
    /// Pulled chunks that shrink as the range drains
    Guided,
    /// Split decided by the work-stealing runtime
    Auto,
}

impl SchedulePolicy {
    /// All policies, in the order sweeps enumerate them
    pub const ALL: [SchedulePolicy; 4] = [
        SchedulePolicy::Static,
        SchedulePolicy::Dynamic,
        SchedulePolicy::Guided,
        SchedulePolicy::Auto,
    ];

    /// Lowercase name used in config files and reports
    pub fn as_str(self) -> &'static str {
        match self {
            SchedulePolicy::Static => "static",
            SchedulePolicy::Dynamic => "dynamic",
            SchedulePolicy::Guided => "guided",
            SchedulePolicy::Auto => "auto",
        }
    }

    /// Whether this policy honours a chunk size
    pub fn uses_chunk_size(self) -> bool {
        !matches!(self, SchedulePolicy::Auto)
    }
}

impl fmt::Display for SchedulePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SchedulePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "static" => Ok(SchedulePolicy::Static),
            "dynamic" => Ok(SchedulePolicy::Dynamic),
            "guided" => Ok(SchedulePolicy::Guided),
            "auto" => Ok(SchedulePolicy::Auto),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Non-fatal warning that a schedule asks for more threads than the host has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAdvisory {
    /// Threads requested by the schedule
    pub requested: usize,
    /// Hardware parallelism reported by the OS
    pub available: usize,
}

impl fmt::Display for ResourceAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} threads requested but only {} available; workers will be oversubscribed",
            self.requested, self.available
        )
    }
}

/// A validated partitioning of the index range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    threads: NonZeroUsize,
    policy: SchedulePolicy,
    chunk_size: Option<NonZeroUsize>,
}

impl Schedule {
    /// Build a schedule, rejecting zero threads or a zero chunk size.
    ///
    /// The chunk size is dropped for [`SchedulePolicy::Auto`]. The thread
    /// count is never clamped to the hardware; see [`Schedule::advisory`].
    pub fn new(
        threads: usize,
        policy: SchedulePolicy,
        chunk_size: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let threads = NonZeroUsize::new(threads).ok_or(ConfigError::ZeroThreads)?;
        let chunk_size = match chunk_size {
            Some(c) => Some(NonZeroUsize::new(c).ok_or(ConfigError::ZeroChunkSize)?),
            None => None,
        };

        Ok(Self {
            threads,
            policy,
            chunk_size: if policy.uses_chunk_size() {
                chunk_size
            } else {
                None
            },
        })
    }

    /// Single-threaded static schedule
    pub fn sequential() -> Self {
        Self {
            threads: NonZeroUsize::MIN,
            policy: SchedulePolicy::Static,
            chunk_size: None,
        }
    }

    /// Number of workers
    pub fn threads(&self) -> usize {
        self.threads.get()
    }

    /// Partitioning policy
    pub fn policy(&self) -> SchedulePolicy {
        self.policy
    }

    /// Chunk size, if one applies to the policy
    pub fn chunk_size(&self) -> Option<usize> {
        self.chunk_size.map(NonZeroUsize::get)
    }

    /// Report oversubscription against the host's available parallelism
    pub fn advisory(&self) -> Option<ResourceAdvisory> {
        let available = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        self.advisory_against(available)
    }

    pub(crate) fn advisory_against(&self, available: usize) -> Option<ResourceAdvisory> {
        (self.threads() > available).then_some(ResourceAdvisory {
            requested: self.threads(),
            available,
        })
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.chunk_size {
            Some(c) => write!(f, "{},{} x{}", self.policy, c, self.threads),
            None => write!(f, "{} x{}", self.policy, self.threads),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_threads() {
        assert_eq!(
            Schedule::new(0, SchedulePolicy::Static, None),
            Err(ConfigError::ZeroThreads)
        );
    }

    #[test]
    fn test_rejects_zero_chunk() {
        assert_eq!(
            Schedule::new(4, SchedulePolicy::Dynamic, Some(0)),
            Err(ConfigError::ZeroChunkSize)
        );
    }

    #[test]
    fn test_auto_drops_chunk_size() {
        let schedule = Schedule::new(4, SchedulePolicy::Auto, Some(64)).unwrap();
        assert_eq!(schedule.chunk_size(), None);

        let schedule = Schedule::new(4, SchedulePolicy::Guided, Some(64)).unwrap();
        assert_eq!(schedule.chunk_size(), Some(64));
    }

    #[test]
    fn test_thread_count_not_clamped() {
        let schedule = Schedule::new(4096, SchedulePolicy::Static, None).unwrap();
        assert_eq!(schedule.threads(), 4096);
    }

    #[test]
    fn test_advisory_on_oversubscription() {
        let schedule = Schedule::new(16, SchedulePolicy::Static, None).unwrap();
        let advisory = schedule.advisory_against(8).unwrap();
        assert_eq!(advisory.requested, 16);
        assert_eq!(advisory.available, 8);

        assert!(schedule.advisory_against(16).is_none());
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("static".parse(), Ok(SchedulePolicy::Static));
        assert_eq!("Dynamic".parse(), Ok(SchedulePolicy::Dynamic));
        assert_eq!(" guided ".parse(), Ok(SchedulePolicy::Guided));
        assert_eq!("AUTO".parse(), Ok(SchedulePolicy::Auto));
        assert!(matches!(
            "runtime".parse::<SchedulePolicy>(),
            Err(ConfigError::UnknownPolicy(_))
        ));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for policy in SchedulePolicy::ALL {
            assert_eq!(policy.to_string().parse(), Ok(policy));
        }
    }
}
