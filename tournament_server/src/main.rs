//! Tournament server with an oracle-certified results store.
//!
//! The results oracle is created first and handed to the tournament manager,
//! which reads outcomes from it for the rest of the process lifetime.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use chrono::Duration;
use pico_args::Arguments;
use tournament_oracle::{Identity, ResultsOracle, TournamentManager};
use tournament_server::{
    api::{self, auth::CallerAuth},
    config::ServerConfig,
    events, logging, metrics,
};

const HELP: &str = "\
Run the tournament server

USAGE:
  tournament_server [OPTIONS]

OPTIONS:
  --bind         IP:PORT   Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6969]
  --issue-token  IDENTITY  Print a caller token for IDENTITY and exit
  --token-hours  N         Lifetime of an issued token  [default: 24]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND                   Server bind address (e.g., 0.0.0.0:8080)
  JWT_SECRET                    Caller token signing secret (at least 32 chars)
  ORACLE_ADMIN                  Identity allowed to manage reporters
  ORACLE_REPORTERS              Comma separated reporters authorized at startup
  METRICS_BIND                  Prometheus scrape address (disabled when unset)
  TOURNAMENT_MIN_PARTICIPANTS   Default minimum roster to start [default: 2]
  TOURNAMENT_MAX_PARTICIPANTS   Default roster cap [default: unlimited]
";

struct Args {
    bind: Option<SocketAddr>,
    issue_token: Option<String>,
    token_hours: i64,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        issue_token: pargs.opt_value_from_str("--issue-token")?,
        token_hours: pargs.opt_value_from_str("--token-hours")?.unwrap_or(24),
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind)?;
    config.validate()?;

    let auth = Arc::new(CallerAuth::new(&config.jwt_secret));

    if let Some(identity) = args.issue_token {
        let token = auth.issue(&Identity::new(identity), Duration::hours(args.token_hours))?;
        println!("{token}");
        return Ok(());
    }

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(anyhow::Error::msg)?;
        tracing::info!("Prometheus metrics exposed at http://{}/metrics", metrics_bind);
    }

    let oracle = Arc::new(ResultsOracle::with_reporters(
        config.oracle_admin.clone(),
        config.reporters.iter().cloned(),
        config.oracle.clone(),
    ));
    let manager = Arc::new(TournamentManager::new(oracle.clone(), config.manager.clone()));

    tracing::info!(
        admin = %config.oracle_admin,
        reporters = config.reporters.len(),
        "Results oracle ready"
    );
    metrics::oracle_reporters(config.reporters.len());

    let recorder = events::spawn_event_recorder(oracle.subscribe(), manager.subscribe());

    let state = api::AppState {
        manager,
        oracle,
        auth,
    };
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    tracing::info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    tracing::info!("Shutting down server...");
    recorder.abort();

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for CTRL+C: {}", e);
        std::future::pending::<()>().await;
    }
}
