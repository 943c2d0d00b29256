//! Results oracle: the authoritative store of attested tournament outcomes.
//!
//! Authorized reporters submit one outcome per key. A submitted record is
//! finalized on arrival and can never be overwritten; any caller may read it.
//! The reporter set is owned by the oracle and changed only by its admin.
//!
//! ## Example
//!
//! ```
//! use tournament_oracle::config::OracleConfig;
//! use tournament_oracle::ids::{Identity, TournamentId};
//! use tournament_oracle::oracle::{OutcomeKey, OutcomePayload, ResultsOracle};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let oracle = ResultsOracle::with_reporters(
//!     Identity::from("admin"),
//!     [Identity::from("referee")],
//!     OracleConfig::default(),
//! );
//!
//! let key = OutcomeKey::tournament(TournamentId::new(1));
//! let payload = OutcomePayload::Winner { winner: Identity::from("alice") };
//! oracle.submit_result(key.clone(), payload, &Identity::from("referee")).await?;
//!
//! assert!(oracle.get_result(&key).await.unwrap().finalized);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod models;
pub mod results;
pub mod source;

pub use errors::{OracleError, OracleResult};
pub use models::{OracleEvent, OutcomeKey, OutcomePayload, OutcomeReceipt, OutcomeRecord};
pub use results::ResultsOracle;
pub use source::ResultsSource;
