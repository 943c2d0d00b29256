//! Results oracle storing write-once outcome records.

use super::{
    errors::{OracleError, OracleResult},
    models::{OracleEvent, OutcomeKey, OutcomePayload, OutcomeReceipt, OutcomeRecord},
    source::ResultsSource,
};
use crate::{
    config::OracleConfig,
    ids::{Identity, TournamentId},
};
use async_trait::async_trait;
use chrono::Utc;
use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::sync::{RwLock, broadcast};

/// A key's record; set exactly once
type OutcomeSlot = Arc<OnceLock<OutcomeRecord>>;

/// Authoritative store of attested outcomes
#[derive(Clone)]
pub struct ResultsOracle {
    /// Identity allowed to change the reporter set
    admin: Identity,

    /// Authorized reporters, consulted on every submission
    reporters: Arc<RwLock<HashSet<Identity>>>,

    /// Outcome slots by key
    outcomes: Arc<RwLock<HashMap<OutcomeKey, OutcomeSlot>>>,

    /// Last issued submission sequence number
    last_sequence: Arc<AtomicU64>,

    events: broadcast::Sender<OracleEvent>,
}

impl ResultsOracle {
    /// Create an oracle with an empty reporter set
    pub fn new(admin: Identity, config: OracleConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);

        Self {
            admin,
            reporters: Arc::new(RwLock::new(HashSet::new())),
            outcomes: Arc::new(RwLock::new(HashMap::new())),
            last_sequence: Arc::new(AtomicU64::new(0)),
            events,
        }
    }

    /// Create an oracle with an initial reporter set
    pub fn with_reporters(
        admin: Identity,
        reporters: impl IntoIterator<Item = Identity>,
        config: OracleConfig,
    ) -> Self {
        let mut oracle = Self::new(admin, config);
        let reporters: HashSet<Identity> = reporters.into_iter().collect();
        oracle.reporters = Arc::new(RwLock::new(reporters));
        oracle
    }

    pub fn admin(&self) -> &Identity {
        &self.admin
    }

    /// Subscribe to oracle notifications
    pub fn subscribe(&self) -> broadcast::Receiver<OracleEvent> {
        self.events.subscribe()
    }

    /// Submit an attested outcome.
    ///
    /// The reporter must be authorized at the time of the call and `key` must
    /// not already hold a finalized record. Sequence numbers are strictly
    /// increasing in acceptance order; a submission that loses a race for the
    /// same key may leave a gap.
    ///
    /// # Errors
    ///
    /// * `OracleError::Unauthorized` - reporter is not in the authorized set
    /// * `OracleError::InvalidPayload` - empty ranking or a ranking with repeats
    /// * `OracleError::AlreadyFinalized` - key already holds a record
    pub async fn submit_result(
        &self,
        key: OutcomeKey,
        payload: OutcomePayload,
        reporter: &Identity,
    ) -> OracleResult<OutcomeReceipt> {
        if !self.is_authorized_reporter(reporter).await {
            log::warn!("Rejected result for {} from unauthorized reporter {}", key, reporter);
            return Err(OracleError::Unauthorized(reporter.clone()));
        }

        if let Err(reason) = payload.validate() {
            return Err(OracleError::InvalidPayload { key, reason });
        }

        let slot = self.slot(&key).await;
        if slot.get().is_some() {
            return Err(OracleError::AlreadyFinalized(key));
        }

        let sequence = self.last_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let record = OutcomeRecord {
            key: key.clone(),
            reporter: reporter.clone(),
            payload,
            sequence,
            submitted_at: Utc::now(),
            finalized: true,
        };

        if slot.set(record).is_err() {
            return Err(OracleError::AlreadyFinalized(key));
        }

        log::info!("Recorded result #{} for {} from {}", sequence, key, reporter);
        let _ = self.events.send(OracleEvent::ResultRecorded {
            key: key.clone(),
            reporter: reporter.clone(),
            sequence,
        });

        Ok(OutcomeReceipt { key, sequence })
    }

    /// Read the record stored under `key`, if any
    pub async fn get_result(&self, key: &OutcomeKey) -> Option<OutcomeRecord> {
        let outcomes = self.outcomes.read().await;
        outcomes.get(key).and_then(|slot| slot.get().cloned())
    }

    /// All records belonging to a tournament, in submission order
    pub async fn results_for_tournament(&self, tournament: TournamentId) -> Vec<OutcomeRecord> {
        let outcomes = self.outcomes.read().await;
        let mut records: Vec<OutcomeRecord> = outcomes
            .iter()
            .filter(|(key, _)| key.tournament == tournament)
            .filter_map(|(_, slot)| slot.get().cloned())
            .collect();
        records.sort_by_key(|record| record.sequence);
        records
    }

    pub async fn is_authorized_reporter(&self, identity: &Identity) -> bool {
        self.reporters.read().await.contains(identity)
    }

    /// Sorted snapshot of the reporter set
    pub async fn reporters(&self) -> Vec<Identity> {
        let mut reporters: Vec<Identity> = self.reporters.read().await.iter().cloned().collect();
        reporters.sort();
        reporters
    }

    /// Authorize a reporter. Returns `false` if it was already authorized.
    pub async fn add_reporter(&self, caller: &Identity, reporter: Identity) -> OracleResult<bool> {
        self.require_admin(caller)?;

        let added = self.reporters.write().await.insert(reporter.clone());
        if added {
            log::info!("Authorized reporter {}", reporter);
            let _ = self.events.send(OracleEvent::ReporterAdded { reporter });
        }
        Ok(added)
    }

    /// Revoke a reporter. Returns `false` if it was not authorized.
    pub async fn remove_reporter(&self, caller: &Identity, reporter: &Identity) -> OracleResult<bool> {
        self.require_admin(caller)?;

        let removed = self.reporters.write().await.remove(reporter);
        if removed {
            log::info!("Revoked reporter {}", reporter);
            let _ = self.events.send(OracleEvent::ReporterRemoved {
                reporter: reporter.clone(),
            });
        }
        Ok(removed)
    }

    fn require_admin(&self, caller: &Identity) -> OracleResult<()> {
        if *caller != self.admin {
            log::warn!("Rejected reporter-set change from non-admin {}", caller);
            return Err(OracleError::Unauthorized(caller.clone()));
        }
        Ok(())
    }

    /// Existing slot for `key`, or a fresh empty one
    async fn slot(&self, key: &OutcomeKey) -> OutcomeSlot {
        let existing = self.outcomes.read().await.get(key).cloned();
        if let Some(slot) = existing {
            return slot;
        }

        let mut outcomes = self.outcomes.write().await;
        outcomes.entry(key.clone()).or_default().clone()
    }
}

#[async_trait]
impl ResultsSource for ResultsOracle {
    async fn get_result(&self, key: &OutcomeKey) -> Option<OutcomeRecord> {
        ResultsOracle::get_result(self, key).await
    }

    async fn is_authorized_reporter(&self, identity: &Identity) -> bool {
        ResultsOracle::is_authorized_reporter(self, identity).await
    }
}
