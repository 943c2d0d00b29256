//! Results oracle API handlers.
//!
//! Reporters submit outcomes here; anyone can read them back. Managing the
//! reporter set is reserved to the oracle admin, which the oracle itself
//! enforces against the caller identity.

use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tournament_oracle::{
    Identity, OracleError, OutcomeKey, OutcomePayload, OutcomeRecord, TournamentId,
    oracle::OutcomeReceipt,
};

use super::{
    AppState,
    error::ApiError,
    extract::{JsonBody, PathParam, QueryParams},
};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct SubmitResultRequest {
    pub tournament_id: TournamentId,
    /// Match inside the tournament, omitted for the overall result
    pub match_id: Option<String>,
    pub payload: OutcomePayload,
}

#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    pub match_id: Option<String>,
    /// List every record of the tournament instead of a single key
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Deserialize)]
pub struct ReporterRequest {
    pub reporter: Identity,
}

#[derive(Debug, Serialize)]
pub struct ReporterStatus {
    pub reporter: Identity,
    pub authorized: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResultsResponse {
    Record(OutcomeRecord),
    Records(Vec<OutcomeRecord>),
}

/// Record an outcome as the calling reporter
pub async fn submit_result(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    JsonBody(request): JsonBody<SubmitResultRequest>,
) -> Result<(StatusCode, Json<OutcomeReceipt>), ApiError> {
    let key = OutcomeKey {
        tournament: request.tournament_id,
        match_id: request.match_id,
    };

    match state.oracle.submit_result(key, request.payload, &caller).await {
        Ok(receipt) => {
            metrics::oracle_submission("accepted");
            Ok((StatusCode::CREATED, Json(receipt)))
        }
        Err(err) => {
            metrics::oracle_submission(err.kind().as_str());
            if let OracleError::Unauthorized(_) = err {
                crate::logging::log_security_event(
                    "unauthorized_reporter",
                    Some(&caller),
                    "/api/v1/results",
                    &err.to_string(),
                );
            }
            Err(err.into())
        }
    }
}

/// Read the record under a key, or every record of the tournament with `?all=true`
pub async fn get_result(
    State(state): State<AppState>,
    PathParam(tournament_id): PathParam<TournamentId>,
    QueryParams(query): QueryParams<ResultQuery>,
) -> Result<Json<ResultsResponse>, ApiError> {
    if query.all {
        let records = state.oracle.results_for_tournament(tournament_id).await;
        return Ok(Json(ResultsResponse::Records(records)));
    }

    let key = OutcomeKey {
        tournament: tournament_id,
        match_id: query.match_id,
    };

    match state.oracle.get_result(&key).await {
        Some(record) => Ok(Json(ResultsResponse::Record(record))),
        None => Err(ApiError::NotFound(format!("No result recorded for {}", key))),
    }
}

pub async fn list_reporters(State(state): State<AppState>) -> Json<Vec<Identity>> {
    Json(state.oracle.reporters().await)
}

pub async fn reporter_status(
    State(state): State<AppState>,
    PathParam(reporter): PathParam<Identity>,
) -> Json<ReporterStatus> {
    let authorized = state.oracle.is_authorized_reporter(&reporter).await;
    Json(ReporterStatus {
        reporter,
        authorized,
    })
}

/// Authorize a reporter (oracle admin only)
pub async fn add_reporter(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    JsonBody(request): JsonBody<ReporterRequest>,
) -> Result<Json<ReporterStatus>, ApiError> {
    state
        .oracle
        .add_reporter(&caller, request.reporter.clone())
        .await?;
    metrics::oracle_reporters(state.oracle.reporters().await.len());

    Ok(Json(ReporterStatus {
        reporter: request.reporter,
        authorized: true,
    }))
}

/// Revoke a reporter (oracle admin only)
///
/// Records already accepted from the reporter stay valid.
pub async fn remove_reporter(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    PathParam(reporter): PathParam<Identity>,
) -> Result<Json<ReporterStatus>, ApiError> {
    state.oracle.remove_reporter(&caller, &reporter).await?;
    metrics::oracle_reporters(state.oracle.reporters().await.len());

    Ok(Json(ReporterStatus {
        reporter,
        authorized: false,
    }))
}
