//! Read-only view of the oracle handed to consumers such as the tournament manager.

use super::models::{OutcomeKey, OutcomeRecord};
use crate::ids::Identity;
use async_trait::async_trait;

/// Read capability over attested outcomes.
///
/// Consumers hold this by reference (`Arc<dyn ResultsSource>`) and query it on
/// every use, so they always observe the oracle's current state.
#[async_trait]
pub trait ResultsSource: Send + Sync {
    /// Look up the record stored under `key`
    async fn get_result(&self, key: &OutcomeKey) -> Option<OutcomeRecord>;

    /// Whether `identity` is currently in the authorized reporter set
    async fn is_authorized_reporter(&self, identity: &Identity) -> bool;
}
