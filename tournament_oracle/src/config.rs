//! Runtime configuration for the oracle and the tournament manager.
//!
//! Both structures can be built from environment variables, falling back to
//! the defaults below for anything unset or unparsable.

use std::env;

/// Default broadcast buffer for oracle and manager events
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Default minimum roster size required to start a tournament
pub const DEFAULT_MIN_PARTICIPANTS: usize = 2;

/// Results oracle configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    /// Capacity of the `OracleEvent` broadcast channel
    pub event_capacity: usize,
}

impl OracleConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `ORACLE_EVENT_CAPACITY`: broadcast buffer size (default: 256)
    pub fn from_env() -> Self {
        Self {
            event_capacity: env::var("ORACLE_EVENT_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|capacity| *capacity > 0)
                .unwrap_or(DEFAULT_EVENT_CAPACITY),
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Tournament manager configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Minimum participants applied to tournaments created without an explicit config
    pub min_participants: usize,

    /// Roster cap applied to tournaments created without an explicit config
    pub max_participants: Option<usize>,

    /// Capacity of the `TournamentEvent` broadcast channel
    pub event_capacity: usize,
}

impl ManagerConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `TOURNAMENT_MIN_PARTICIPANTS`: minimum roster to start (default: 2)
    /// - `TOURNAMENT_MAX_PARTICIPANTS`: roster cap (default: unlimited)
    /// - `TOURNAMENT_EVENT_CAPACITY`: broadcast buffer size (default: 256)
    pub fn from_env() -> Self {
        Self {
            min_participants: env::var("TOURNAMENT_MIN_PARTICIPANTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|min| *min > 0)
                .unwrap_or(DEFAULT_MIN_PARTICIPANTS),
            max_participants: env::var("TOURNAMENT_MAX_PARTICIPANTS")
                .ok()
                .and_then(|v| v.parse().ok()),
            event_capacity: env::var("TOURNAMENT_EVENT_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|capacity| *capacity > 0)
                .unwrap_or(DEFAULT_EVENT_CAPACITY),
        }
    }

    /// Same defaults with a different minimum roster
    pub fn with_min_participants(mut self, min_participants: usize) -> Self {
        self.min_participants = min_participants;
        self
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            min_participants: DEFAULT_MIN_PARTICIPANTS,
            max_participants: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}
