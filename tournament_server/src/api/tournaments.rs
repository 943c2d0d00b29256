//! Tournament API handlers.
//!
//! Reads and `finalize` are public. Everything that changes a tournament on
//! someone's behalf runs behind the auth middleware, and the caller identity
//! from the token is what the manager checks admin rights against.
//!
//! # Examples
//!
//! Create a tournament:
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/tournaments \
//!   -H "Authorization: Bearer TOKEN" \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Spring Cup", "min_participants": 4}'
//! ```
//!
//! Finalize once the oracle holds the result:
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/tournaments/1/finalize
//! ```

use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tournament_oracle::{
    Identity, OutcomeRecord, TournamentId,
    tournament::{ParticipantPage, TournamentConfig, TournamentInfo, TournamentState},
};

use super::{
    AppState,
    error::ApiError,
    extract::{JsonBody, PathParam, QueryParams},
};

/// Default roster page size
const DEFAULT_PAGE_LIMIT: usize = 100;

/// Largest roster page a client may request
const MAX_PAGE_LIMIT: usize = 1000;

#[derive(Debug, Default, Deserialize)]
pub struct CreateTournamentRequest {
    pub name: Option<String>,
    pub min_participants: Option<usize>,
    pub max_participants: Option<usize>,
}

impl CreateTournamentRequest {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.min_participants.is_none() && self.max_participants.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Participant to enroll, the caller when omitted
    pub participant: Option<Identity>,
}

#[derive(Debug, Deserialize)]
pub struct DelegateRequest {
    pub delegate: Identity,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub state: Option<TournamentState>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DelegateResponse {
    pub delegate: Identity,
    pub changed: bool,
}

/// List tournaments, optionally filtered with `?state=<state>`
pub async fn list_tournaments(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListQuery>,
) -> Json<Vec<TournamentInfo>> {
    Json(state.manager.list_tournaments(query.state).await)
}

/// Create a tournament organized by the caller
///
/// Without a body, or without any settings in it, the manager's defaults apply.
pub async fn create_tournament(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    body: Option<JsonBody<CreateTournamentRequest>>,
) -> Result<(StatusCode, Json<TournamentInfo>), ApiError> {
    let request = body.map(|JsonBody(request)| request).unwrap_or_default();
    let defaults = state.manager.default_config();
    let config = if request.is_empty() {
        defaults
    } else {
        TournamentConfig {
            name: request.name.unwrap_or_default(),
            min_participants: request.min_participants.unwrap_or(defaults.min_participants),
            max_participants: request.max_participants.or(defaults.max_participants),
        }
    };

    let info = state.manager.create_tournament_info(caller, config).await?;
    Ok((StatusCode::CREATED, Json(info)))
}

pub async fn get_tournament(
    State(state): State<AppState>,
    PathParam(id): PathParam<TournamentId>,
) -> Result<Json<TournamentInfo>, ApiError> {
    Ok(Json(state.manager.get_tournament(id).await?))
}

pub async fn open_registration(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    PathParam(id): PathParam<TournamentId>,
) -> Result<Json<TournamentInfo>, ApiError> {
    Ok(Json(state.manager.open_registration(id, &caller).await?))
}

/// Register a participant, the caller unless the body names someone else
pub async fn register(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    PathParam(id): PathParam<TournamentId>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<TournamentInfo>), ApiError> {
    let participant = request.participant.unwrap_or(caller);
    let info = state.manager.register(id, participant).await?;
    Ok((StatusCode::CREATED, Json(info)))
}

/// A page of the roster in registration order
pub async fn participants(
    State(state): State<AppState>,
    PathParam(id): PathParam<TournamentId>,
    QueryParams(query): QueryParams<PageQuery>,
) -> Result<Json<ParticipantPage>, ApiError> {
    let offset = query.offset.unwrap_or(0);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .min(MAX_PAGE_LIMIT);

    Ok(Json(
        state.manager.participants_page(id, offset, limit).await?,
    ))
}

pub async fn start_tournament(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    PathParam(id): PathParam<TournamentId>,
) -> Result<Json<TournamentInfo>, ApiError> {
    Ok(Json(state.manager.start_tournament(id, &caller).await?))
}

/// Complete a tournament from its oracle result
///
/// Open to any caller: the outcome comes from the oracle, never from the request.
/// Responds `409` with `retryable: true` until the oracle holds the result.
pub async fn finalize(
    State(state): State<AppState>,
    PathParam(id): PathParam<TournamentId>,
) -> Result<Json<TournamentInfo>, ApiError> {
    Ok(Json(state.manager.finalize(id).await?))
}

pub async fn cancel_tournament(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    PathParam(id): PathParam<TournamentId>,
) -> Result<Json<TournamentInfo>, ApiError> {
    Ok(Json(state.manager.cancel_tournament(id, &caller).await?))
}

/// Grant admin rights on a tournament (organizer only)
pub async fn add_delegate(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    PathParam(id): PathParam<TournamentId>,
    JsonBody(request): JsonBody<DelegateRequest>,
) -> Result<Json<DelegateResponse>, ApiError> {
    let changed = state
        .manager
        .delegate_admin(id, &caller, request.delegate.clone())
        .await?;

    Ok(Json(DelegateResponse {
        delegate: request.delegate,
        changed,
    }))
}

/// Revoke delegated admin rights (organizer only)
pub async fn remove_delegate(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    PathParam((id, delegate)): PathParam<(TournamentId, Identity)>,
) -> Result<Json<DelegateResponse>, ApiError> {
    let changed = state.manager.revoke_admin(id, &caller, &delegate).await?;
    Ok(Json(DelegateResponse { delegate, changed }))
}

/// The oracle record a completed tournament points at
pub async fn tournament_result(
    State(state): State<AppState>,
    PathParam(id): PathParam<TournamentId>,
) -> Result<Json<OutcomeRecord>, ApiError> {
    state
        .manager
        .resolve_result(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Tournament {} has no certified result", id)))
}
