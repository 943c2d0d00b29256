//! HTTP front end for oracle-certified tournaments.
//!
//! Exposes the [`tournament_oracle`] manager and results oracle over a JSON
//! API, authenticating callers with bearer tokens.

pub mod api;
pub mod config;
pub mod events;
pub mod logging;
pub mod metrics;
