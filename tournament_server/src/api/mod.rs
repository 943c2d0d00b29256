//! HTTP API for the tournament manager and the results oracle.
//!
//! # Modules
//!
//! - [`auth`]: Caller token issuing and verification
//! - [`middleware`]: Authentication middleware for protected endpoints
//! - [`tournaments`]: Tournament lifecycle, roster and delegation
//! - [`results`]: Result submission, lookup and reporter management
//! - [`error`]: JSON error responses
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tournament_oracle::{Identity, ManagerConfig, OracleConfig, ResultsOracle, TournamentManager};
//! use tournament_server::api::{AppState, auth::CallerAuth, create_router};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let oracle = Arc::new(ResultsOracle::new(Identity::from("admin"), OracleConfig::default()));
//! let manager = Arc::new(TournamentManager::new(oracle.clone(), ManagerConfig::default()));
//!
//! let state = AppState {
//!     manager,
//!     oracle,
//!     auth: Arc::new(CallerAuth::new("a_secret_of_at_least_thirty_two_chars")),
//! };
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:6969").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod auth;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod results;
pub mod tournaments;

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
};
use serde_json::json;
use std::sync::Arc;
use tournament_oracle::{ResultsOracle, TournamentManager};
use tower_http::cors::CorsLayer;

use auth::CallerAuth;

/// Application state shared across all HTTP handlers.
///
/// The manager holds its own reference to the same oracle; handlers use
/// `oracle` only for the oracle's own endpoints.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<TournamentManager>,
    pub oracle: Arc<ResultsOracle>,
    pub auth: Arc<CallerAuth>,
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Endpoint Summary
///
/// ```text
/// GET    /health                                        - Health check (public)
/// GET    /api/v1/tournaments?state=<state>              - List tournaments (public)
/// POST   /api/v1/tournaments                            - Create tournament (auth required)
/// GET    /api/v1/tournaments/{id}                       - Get tournament (public)
/// POST   /api/v1/tournaments/{id}/open                  - Open registration (auth required)
/// POST   /api/v1/tournaments/{id}/register              - Register participant (auth required)
/// GET    /api/v1/tournaments/{id}/participants          - Roster page (public)
/// POST   /api/v1/tournaments/{id}/start                 - Start tournament (auth required)
/// POST   /api/v1/tournaments/{id}/finalize              - Finalize from oracle (public)
/// POST   /api/v1/tournaments/{id}/cancel                - Cancel tournament (auth required)
/// POST   /api/v1/tournaments/{id}/delegates             - Delegate admin (auth required)
/// DELETE /api/v1/tournaments/{id}/delegates/{identity}  - Revoke delegate (auth required)
/// GET    /api/v1/tournaments/{id}/result                - Certified result (public)
/// POST   /api/v1/results                                - Submit result (auth required)
/// GET    /api/v1/results/{tournament_id}?match_id=      - Read result (public)
/// GET    /api/v1/reporters                              - List reporters (public)
/// GET    /api/v1/reporters/{identity}                   - Reporter status (public)
/// POST   /api/v1/reporters                              - Add reporter (auth required)
/// DELETE /api/v1/reporters/{identity}                   - Remove reporter (auth required)
/// ```
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn create_v1_router(state: AppState) -> Router<AppState> {
    // Public routes (no authentication middleware)
    let public_routes = Router::new()
        .route("/tournaments", get(tournaments::list_tournaments))
        .route("/tournaments/{id}", get(tournaments::get_tournament))
        .route(
            "/tournaments/{id}/participants",
            get(tournaments::participants),
        )
        .route("/tournaments/{id}/finalize", post(tournaments::finalize))
        .route("/tournaments/{id}/result", get(tournaments::tournament_result))
        .route("/results/{tournament_id}", get(results::get_result))
        .route("/reporters", get(results::list_reporters))
        .route("/reporters/{identity}", get(results::reporter_status));

    // Protected routes (caller identity comes from the bearer token)
    let protected_routes = Router::new()
        .route("/tournaments", post(tournaments::create_tournament))
        .route("/tournaments/{id}/open", post(tournaments::open_registration))
        .route("/tournaments/{id}/register", post(tournaments::register))
        .route("/tournaments/{id}/start", post(tournaments::start_tournament))
        .route("/tournaments/{id}/cancel", post(tournaments::cancel_tournament))
        .route("/tournaments/{id}/delegates", post(tournaments::add_delegate))
        .route(
            "/tournaments/{id}/delegates/{identity}",
            delete(tournaments::remove_delegate),
        )
        .route("/results", post(results::submit_result))
        .route("/reporters", post(results::add_reporter))
        .route("/reporters/{identity}", delete(results::remove_reporter))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new().merge(public_routes).merge(protected_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// ```bash
/// curl http://localhost:6969/health
/// # {"status":"healthy","tournaments":3,"reporters":2,"timestamp":"2026-10-19T10:30:00Z",...}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let response = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "tournaments": state.manager.tournament_count().await,
        "reporters": state.oracle.reporters().await.len(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Json(response)
}
