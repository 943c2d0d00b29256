//! # Tournament Oracle
//!
//! Tournament lifecycle management whose outcomes are certified by a trusted
//! results oracle.
//!
//! ## Architecture
//!
//! Two components share no mutable state with each other:
//!
//! - **[`oracle::ResultsOracle`]**: authoritative, write-once store of attested
//!   outcomes. Only authorized reporters may submit; anyone may read.
//! - **[`tournament::TournamentManager`]**: owns tournament records and their
//!   state machine. It is bound at construction to one oracle through the
//!   read-only [`oracle::ResultsSource`] trait and keeps only references
//!   (key + sequence number) into it.
//!
//! Every operation is atomic per tournament or per outcome key: the state
//! check and the write happen under that record's own lock, so operations on
//! different tournaments do not serialize behind each other.
//!
//! ## Core Modules
//!
//! - [`oracle`]: outcome records, reporter set, submission and lookup
//! - [`tournament`]: tournament models, errors and the manager
//! - [`config`]: environment-driven configuration
//! - [`ids`]: identity and tournament id types

pub mod config;
pub mod error;
pub mod ids;
pub mod oracle;
pub mod tournament;

pub use config::{ManagerConfig, OracleConfig};
pub use error::ErrorKind;
pub use ids::{Identity, TournamentId};
pub use oracle::{OracleError, OutcomeKey, OutcomePayload, OutcomeRecord, ResultsOracle, ResultsSource};
pub use tournament::{TournamentError, TournamentManager, TournamentState};
