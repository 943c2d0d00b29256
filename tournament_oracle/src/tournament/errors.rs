//! Tournament manager error types.

use super::models::TournamentState;
use crate::{
    error::ErrorKind,
    ids::{Identity, TournamentId},
};
use thiserror::Error;

/// Tournament errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    #[error("Tournament not found: {0}")]
    NotFound(TournamentId),

    /// Caller lacks the admin role the operation requires
    #[error("Unauthorized: {caller} may not {operation}")]
    Unauthorized {
        caller: Identity,
        operation: &'static str,
    },

    #[error("Cannot {operation} tournament {id} while {state:?}")]
    InvalidStateTransition {
        id: TournamentId,
        state: TournamentState,
        operation: &'static str,
    },

    #[error("{participant} is already registered for tournament {id}")]
    AlreadyRegistered {
        id: TournamentId,
        participant: Identity,
    },

    #[error("Tournament {0} is already finalized")]
    AlreadyFinalized(TournamentId),

    /// The oracle holds no finalized result yet; retry later
    #[error("No finalized result available for tournament {0}")]
    ResultNotAvailable(TournamentId),

    #[error("Insufficient participants: need {needed}, have {current}")]
    InsufficientParticipants { needed: usize, current: usize },

    #[error("Tournament {id} is full ({max} participants)")]
    TournamentFull { id: TournamentId, max: usize },

    #[error("Invalid tournament config: {0}")]
    InvalidConfig(String),
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TournamentError::NotFound(_) => ErrorKind::NotFound,
            TournamentError::Unauthorized { .. } => ErrorKind::Unauthorized,
            TournamentError::InvalidStateTransition { .. } => ErrorKind::InvalidStateTransition,
            TournamentError::AlreadyRegistered { .. } => ErrorKind::AlreadyRegistered,
            TournamentError::AlreadyFinalized(_) => ErrorKind::AlreadyFinalized,
            TournamentError::ResultNotAvailable(_) => ErrorKind::ResultNotAvailable,
            TournamentError::InsufficientParticipants { .. } => {
                ErrorKind::InsufficientParticipants
            }
            TournamentError::TournamentFull { .. } => ErrorKind::TournamentFull,
            TournamentError::InvalidConfig(_) => ErrorKind::InvalidConfig,
        }
    }

    /// Whether calling again unchanged may succeed
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;
