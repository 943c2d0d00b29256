//! Results oracle error types.

use super::models::OutcomeKey;
use crate::{error::ErrorKind, ids::Identity};
use thiserror::Error;

/// Oracle errors. All are terminal: resubmitting unchanged never succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// Caller is not an authorized reporter (or not the oracle admin)
    #[error("Unauthorized: {0} is not permitted to perform this oracle operation")]
    Unauthorized(Identity),

    /// A finalized record already exists for the key
    #[error("Result already finalized for {0}")]
    AlreadyFinalized(OutcomeKey),

    /// The payload cannot serve as a result
    #[error("Invalid result for {key}: {reason}")]
    InvalidPayload {
        key: OutcomeKey,
        reason: &'static str,
    },
}

/// Result type for oracle operations
pub type OracleResult<T> = Result<T, OracleError>;

impl OracleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OracleError::Unauthorized(_) => ErrorKind::Unauthorized,
            OracleError::AlreadyFinalized(_) => ErrorKind::AlreadyFinalized,
            OracleError::InvalidPayload { .. } => ErrorKind::InvalidPayload,
        }
    }
}
