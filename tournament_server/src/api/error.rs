//! Error responses for API handlers.
//!
//! Every failure is rendered as
//! `{"error": <message>, "kind": <error kind>, "retryable": <bool>}` so clients
//! can branch on `kind` and poll again when `retryable` is set. Domain kinds
//! come from [`ErrorKind`]; `unauthenticated` and `invalid_request` cover
//! failures that never reach the manager or the oracle.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tournament_oracle::{ErrorKind, OracleError, TournamentError};

use crate::metrics;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    pub retryable: bool,
}

/// Handler error, converted into a JSON error response
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Tournament(#[from] TournamentError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// A lookup outside the tournament registry found nothing
    #[error("{0}")]
    NotFound(String),

    /// Missing, malformed or expired bearer token
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// Body, path or query string could not be extracted
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl ApiError {
    fn domain_kind(&self) -> Option<ErrorKind> {
        match self {
            ApiError::Tournament(err) => Some(err.kind()),
            ApiError::Oracle(err) => Some(err.kind()),
            ApiError::NotFound(_) => Some(ErrorKind::NotFound),
            ApiError::Unauthenticated(_) | ApiError::Rejected { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated(_) => "unauthenticated",
            ApiError::Rejected { .. } => "invalid_request",
            _ => self.domain_kind().map_or("internal", ErrorKind::as_str),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Rejected { status, .. } => *status,
            _ => self
                .domain_kind()
                .map_or(StatusCode::INTERNAL_SERVER_ERROR, status_for),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.domain_kind().is_some_and(ErrorKind::is_retryable)
    }
}

/// HTTP status for an error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidConfig | ErrorKind::InvalidPayload => StatusCode::BAD_REQUEST,
        ErrorKind::InvalidStateTransition
        | ErrorKind::AlreadyRegistered
        | ErrorKind::AlreadyFinalized
        | ErrorKind::ResultNotAvailable
        | ErrorKind::InsufficientParticipants
        | ErrorKind::TournamentFull => StatusCode::CONFLICT,
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        metrics::api_error(kind);

        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
            kind,
            retryable: self.is_retryable(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tournament_oracle::{Identity, TournamentId};

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::Unauthorized), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::InvalidConfig), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::InvalidPayload), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::ResultNotAvailable), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::AlreadyFinalized), StatusCode::CONFLICT);
    }

    #[test]
    fn test_kind_passthrough() {
        let err = ApiError::from(TournamentError::ResultNotAvailable(TournamentId::new(7)));
        assert_eq!(err.kind(), "result_not_available");
        assert!(err.is_retryable());

        let err = ApiError::from(OracleError::Unauthorized(Identity::from("mallory")));
        assert_eq!(err.kind(), "unauthorized");
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_transport_errors_are_not_retryable() {
        let err = ApiError::Unauthenticated("Missing bearer token");
        assert_eq!(err.kind(), "unauthenticated");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert!(!err.is_retryable());

        let err = ApiError::Rejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "bad body".to_string(),
        };
        assert_eq!(err.kind(), "invalid_request");
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
