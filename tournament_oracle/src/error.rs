//! Error classification shared by the oracle and the manager.

use serde::{Deserialize, Serialize};

/// Kind of a failed operation, stable across error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    InvalidStateTransition,
    AlreadyRegistered,
    AlreadyFinalized,
    ResultNotAvailable,
    InsufficientParticipants,
    NotFound,
    TournamentFull,
    InvalidConfig,
    InvalidPayload,
}

impl ErrorKind {
    /// Only a missing oracle result is worth retrying unchanged
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::ResultNotAvailable)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::InvalidStateTransition => "invalid_state_transition",
            ErrorKind::AlreadyRegistered => "already_registered",
            ErrorKind::AlreadyFinalized => "already_finalized",
            ErrorKind::ResultNotAvailable => "result_not_available",
            ErrorKind::InsufficientParticipants => "insufficient_participants",
            ErrorKind::NotFound => "not_found",
            ErrorKind::TournamentFull => "tournament_full",
            ErrorKind::InvalidConfig => "invalid_config",
            ErrorKind::InvalidPayload => "invalid_payload",
        }
    }
}
