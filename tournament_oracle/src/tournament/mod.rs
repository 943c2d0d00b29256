//! Tournament module: lifecycle management driven by oracle-attested results.
//!
//! This module provides:
//! - Tournament creation with per-tournament participant limits
//! - Organizer-gated transitions (open registration, start, cancel) with delegation
//! - Participant registration in arrival order
//! - Permissionless finalization from the bound results oracle
//!
//! ## Lifecycle
//!
//! ```text
//! Created ──► Registering ──► InProgress ──► Completed
//!    │             │
//!    └─────────────┴──► Cancelled
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tournament_oracle::config::{ManagerConfig, OracleConfig};
//! use tournament_oracle::ids::Identity;
//! use tournament_oracle::oracle::{OutcomeKey, OutcomePayload, ResultsOracle};
//! use tournament_oracle::tournament::{TournamentManager, TournamentState};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let referee = Identity::from("referee");
//! let oracle = Arc::new(ResultsOracle::with_reporters(
//!     Identity::from("admin"),
//!     [referee.clone()],
//!     OracleConfig::default(),
//! ));
//! let manager = TournamentManager::new(oracle.clone(), ManagerConfig::default());
//!
//! let organizer = Identity::from("alice");
//! let id = manager.create_tournament(organizer.clone()).await?;
//! manager.open_registration(id, &organizer).await?;
//! manager.register(id, Identity::from("p1")).await?;
//! manager.register(id, Identity::from("p2")).await?;
//! manager.start_tournament(id, &organizer).await?;
//!
//! let payload = OutcomePayload::Winner { winner: Identity::from("p1") };
//! oracle.submit_result(OutcomeKey::tournament(id), payload, &referee).await?;
//!
//! manager.finalize(id).await?;
//! assert_eq!(manager.get_tournament(id).await?.state, TournamentState::Completed);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{TournamentError, TournamentResult};
pub use manager::TournamentManager;
pub use models::{
    ParticipantPage, ResultRef, TournamentConfig, TournamentEvent, TournamentInfo,
    TournamentState,
};
