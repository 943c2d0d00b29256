//! Tournament manager for creating tournaments and finalizing them from oracle results.

use super::{
    errors::{TournamentError, TournamentResult},
    models::{
        ParticipantPage, ResultRef, Tournament, TournamentConfig, TournamentEvent, TournamentInfo,
        TournamentState,
    },
};
use crate::{
    config::ManagerConfig,
    ids::{Identity, TournamentId},
    oracle::{OutcomeKey, OutcomeRecord, ResultsSource},
};
use chrono::Utc;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::sync::{Mutex, RwLock, broadcast};

/// Shared handle to one tournament record; its lock guards every transition
type TournamentHandle = Arc<Mutex<Tournament>>;

/// Tournament manager
///
/// Cloning is cheap and every clone shares the same tournaments and oracle.
#[derive(Clone)]
pub struct TournamentManager {
    /// Oracle the manager was bound to at construction
    oracle: Arc<dyn ResultsSource>,

    /// Tournament records by id
    tournaments: Arc<RwLock<HashMap<TournamentId, TournamentHandle>>>,

    /// Last issued tournament id
    last_id: Arc<AtomicU64>,

    config: ManagerConfig,

    events: broadcast::Sender<TournamentEvent>,
}

impl TournamentManager {
    /// Create a tournament manager bound to `oracle` for its whole lifetime
    ///
    /// # Arguments
    ///
    /// * `oracle` - Read capability over attested results
    /// * `config` - Defaults for new tournaments and event buffering
    pub fn new(oracle: Arc<dyn ResultsSource>, config: ManagerConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);

        Self {
            oracle,
            tournaments: Arc::new(RwLock::new(HashMap::new())),
            last_id: Arc::new(AtomicU64::new(0)),
            config,
            events,
        }
    }

    /// Subscribe to lifecycle notifications
    pub fn subscribe(&self) -> broadcast::Receiver<TournamentEvent> {
        self.events.subscribe()
    }

    /// Create a tournament using the manager's default participant limits
    pub async fn create_tournament(&self, organizer: Identity) -> TournamentResult<TournamentId> {
        self.create_tournament_with(organizer, self.default_config())
            .await
    }

    /// Create a tournament with explicit settings
    ///
    /// An empty name is replaced by `Tournament #<id>`.
    pub async fn create_tournament_with(
        &self,
        organizer: Identity,
        config: TournamentConfig,
    ) -> TournamentResult<TournamentId> {
        self.create_tournament_info(organizer, config)
            .await
            .map(|info| info.id)
    }

    /// Create a tournament and return its initial snapshot
    pub async fn create_tournament_info(
        &self,
        organizer: Identity,
        mut config: TournamentConfig,
    ) -> TournamentResult<TournamentInfo> {
        config.validate()?;

        let id = TournamentId::new(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        if config.name.trim().is_empty() {
            config.name = format!("Tournament #{}", id);
        }

        let tournament = Tournament::new(id, organizer.clone(), config);
        let info = tournament.info();
        self.tournaments
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(tournament)));

        log::info!("Created tournament {} for organizer {}", id, organizer);
        self.publish(TournamentEvent::Created { id, organizer });

        Ok(info)
    }

    /// Settings applied to tournaments created without an explicit config
    pub fn default_config(&self) -> TournamentConfig {
        TournamentConfig {
            name: String::new(),
            min_participants: self.config.min_participants,
            max_participants: self.config.max_participants,
        }
    }

    /// Open registration (organizer or delegate, Created only)
    pub async fn open_registration(
        &self,
        id: TournamentId,
        caller: &Identity,
    ) -> TournamentResult<TournamentInfo> {
        let handle = self.handle(id).await?;
        let mut tournament = handle.lock().await;

        require_admin(&tournament, caller, "open_registration")?;
        tournament.advance(TournamentState::Registering, "open_registration")?;

        log::info!("Tournament {} open for registration", id);
        self.publish(TournamentEvent::RegistrationOpened { id });

        Ok(tournament.info())
    }

    /// Register a participant
    ///
    /// Registering an existing member reports `AlreadyRegistered` and changes nothing.
    pub async fn register(
        &self,
        id: TournamentId,
        participant: Identity,
    ) -> TournamentResult<TournamentInfo> {
        let handle = self.handle(id).await?;
        let mut tournament = handle.lock().await;

        if tournament.members.contains(&participant) {
            return Err(TournamentError::AlreadyRegistered { id, participant });
        }

        if tournament.state != TournamentState::Registering {
            return Err(tournament.invalid_transition("register"));
        }

        if let Some(max) = tournament.config.max_participants {
            if tournament.participants.len() >= max {
                return Err(TournamentError::TournamentFull { id, max });
            }
        }

        tournament.members.insert(participant.clone());
        tournament.participants.push(participant.clone());

        log::debug!("Registered {} for tournament {}", participant, id);
        self.publish(TournamentEvent::ParticipantRegistered { id, participant });

        Ok(tournament.info())
    }

    /// Close registration and start (organizer or delegate, Registering only)
    pub async fn start_tournament(
        &self,
        id: TournamentId,
        caller: &Identity,
    ) -> TournamentResult<TournamentInfo> {
        let handle = self.handle(id).await?;
        let mut tournament = handle.lock().await;

        require_admin(&tournament, caller, "start_tournament")?;

        if !tournament
            .state
            .can_transition_to(TournamentState::InProgress)
        {
            return Err(tournament.invalid_transition("start_tournament"));
        }

        let needed = tournament.config.min_participants;
        let current = tournament.participants.len();
        if current < needed {
            return Err(TournamentError::InsufficientParticipants { needed, current });
        }

        tournament.advance(TournamentState::InProgress, "start_tournament")?;
        tournament.started_at = Some(Utc::now());

        log::info!("Tournament {} started with {} participants", id, current);
        self.publish(TournamentEvent::Started { id });

        Ok(tournament.info())
    }

    /// Complete a tournament from the oracle's finalized result. Open to any caller.
    ///
    /// Returns the completed snapshot; its `result_ref` points at the oracle record.
    ///
    /// This is a single poll of the oracle: when no finalized result exists
    /// yet it fails with the retryable `ResultNotAvailable` and the tournament
    /// stays in progress.
    ///
    /// # Errors
    ///
    /// * `AlreadyFinalized` - tournament is already Completed
    /// * `InvalidStateTransition` - tournament is not InProgress
    /// * `ResultNotAvailable` - oracle has no finalized record yet
    pub async fn finalize(&self, id: TournamentId) -> TournamentResult<TournamentInfo> {
        let handle = self.handle(id).await?;
        let mut tournament = handle.lock().await;

        match tournament.state {
            TournamentState::InProgress => {}
            TournamentState::Completed => return Err(TournamentError::AlreadyFinalized(id)),
            _ => return Err(tournament.invalid_transition("finalize")),
        }

        let key = OutcomeKey::tournament(id);
        let record = match self.oracle.get_result(&key).await {
            Some(record) if record.finalized => record,
            _ => return Err(TournamentError::ResultNotAvailable(id)),
        };

        let result_ref = ResultRef {
            key,
            sequence: record.sequence,
        };

        tournament.advance(TournamentState::Completed, "finalize")?;
        tournament.result_ref = Some(result_ref.clone());
        tournament.finished_at = Some(Utc::now());

        log::info!(
            "Tournament {} completed from oracle result #{}",
            id,
            result_ref.sequence
        );
        self.publish(TournamentEvent::Completed { id, result_ref });

        Ok(tournament.info())
    }

    /// Cancel (organizer or delegate, Created or Registering only)
    pub async fn cancel_tournament(
        &self,
        id: TournamentId,
        caller: &Identity,
    ) -> TournamentResult<TournamentInfo> {
        let handle = self.handle(id).await?;
        let mut tournament = handle.lock().await;

        require_admin(&tournament, caller, "cancel_tournament")?;
        tournament.advance(TournamentState::Cancelled, "cancel_tournament")?;
        tournament.finished_at = Some(Utc::now());

        log::info!("Tournament {} cancelled by {}", id, caller);
        self.publish(TournamentEvent::Cancelled { id });

        Ok(tournament.info())
    }

    /// Grant admin rights to `delegate`. Organizer only; returns `false` if already granted.
    pub async fn delegate_admin(
        &self,
        id: TournamentId,
        caller: &Identity,
        delegate: Identity,
    ) -> TournamentResult<bool> {
        let handle = self.handle(id).await?;
        let mut tournament = handle.lock().await;

        require_organizer(&tournament, caller, "delegate_admin")?;
        if tournament.state.is_terminal() {
            return Err(tournament.invalid_transition("delegate_admin"));
        }

        let added = tournament.delegates.insert(delegate.clone());
        if added {
            log::info!("Tournament {}: {} delegated admin to {}", id, caller, delegate);
        }
        Ok(added)
    }

    /// Revoke delegated admin rights. Organizer only; returns `false` if none were held.
    pub async fn revoke_admin(
        &self,
        id: TournamentId,
        caller: &Identity,
        delegate: &Identity,
    ) -> TournamentResult<bool> {
        let handle = self.handle(id).await?;
        let mut tournament = handle.lock().await;

        require_organizer(&tournament, caller, "revoke_admin")?;
        if tournament.state.is_terminal() {
            return Err(tournament.invalid_transition("revoke_admin"));
        }

        let removed = tournament.delegates.remove(delegate);
        if removed {
            log::info!("Tournament {}: {} revoked admin from {}", id, caller, delegate);
        }
        Ok(removed)
    }

    /// Get tournament information
    pub async fn get_tournament(&self, id: TournamentId) -> TournamentResult<TournamentInfo> {
        let handle = self.handle(id).await?;
        let tournament = handle.lock().await;
        Ok(tournament.info())
    }

    /// Participants in registration order
    pub async fn list_participants(&self, id: TournamentId) -> TournamentResult<Vec<Identity>> {
        let handle = self.handle(id).await?;
        let tournament = handle.lock().await;
        Ok(tournament.participants.clone())
    }

    /// A window of the roster, for walking large rosters page by page
    ///
    /// A `limit` of zero is treated as one.
    pub async fn participants_page(
        &self,
        id: TournamentId,
        offset: usize,
        limit: usize,
    ) -> TournamentResult<ParticipantPage> {
        let handle = self.handle(id).await?;
        let tournament = handle.lock().await;

        let total = tournament.participants.len();
        let participants: Vec<Identity> = tournament
            .participants
            .iter()
            .skip(offset)
            .take(limit.max(1))
            .cloned()
            .collect();

        let end = offset.saturating_add(participants.len());
        let next_offset = (end < total).then_some(end);

        Ok(ParticipantPage {
            participants,
            next_offset,
            total,
        })
    }

    /// List all tournaments ordered by id, optionally filtered by state
    pub async fn list_tournaments(
        &self,
        state_filter: Option<TournamentState>,
    ) -> Vec<TournamentInfo> {
        let mut handles: Vec<(TournamentId, TournamentHandle)> = {
            let tournaments = self.tournaments.read().await;
            tournaments
                .iter()
                .map(|(id, handle)| (*id, handle.clone()))
                .collect()
        };
        handles.sort_by_key(|(id, _)| *id);

        let mut infos = Vec::with_capacity(handles.len());
        for (_, handle) in handles {
            let tournament = handle.lock().await;
            if state_filter.is_none_or(|state| tournament.state == state) {
                infos.push(tournament.info());
            }
        }
        infos
    }

    /// Resolve a completed tournament's result reference through the oracle
    pub async fn resolve_result(&self, id: TournamentId) -> TournamentResult<Option<OutcomeRecord>> {
        let result_ref = {
            let handle = self.handle(id).await?;
            let tournament = handle.lock().await;
            tournament.result_ref.clone()
        };

        match result_ref {
            Some(result_ref) => Ok(self.oracle.get_result(&result_ref.key).await),
            None => Ok(None),
        }
    }

    pub async fn tournament_count(&self) -> usize {
        self.tournaments.read().await.len()
    }

    async fn handle(&self, id: TournamentId) -> TournamentResult<TournamentHandle> {
        self.tournaments
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(TournamentError::NotFound(id))
    }

    fn publish(&self, event: TournamentEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

fn require_admin(
    tournament: &Tournament,
    caller: &Identity,
    operation: &'static str,
) -> TournamentResult<()> {
    if !tournament.is_admin(caller) {
        log::warn!(
            "Denied {} on tournament {} to non-admin {}",
            operation,
            tournament.id,
            caller
        );
        return Err(TournamentError::Unauthorized {
            caller: caller.clone(),
            operation,
        });
    }
    Ok(())
}

fn require_organizer(
    tournament: &Tournament,
    caller: &Identity,
    operation: &'static str,
) -> TournamentResult<()> {
    if tournament.organizer != *caller {
        log::warn!(
            "Denied {} on tournament {} to non-organizer {}",
            operation,
            tournament.id,
            caller
        );
        return Err(TournamentError::Unauthorized {
            caller: caller.clone(),
            operation,
        });
    }
    Ok(())
}
