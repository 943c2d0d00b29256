//! Tournament data models.

use super::errors::{TournamentError, TournamentResult};
use crate::{
    ids::{Identity, TournamentId},
    oracle::OutcomeKey,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tournament lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Created, registration not yet open
    Created,
    /// Accepting registrations
    Registering,
    /// Registration closed, awaiting an attested result
    InProgress,
    /// Finalized from an oracle result
    Completed,
    /// Cancelled by an administrator
    Cancelled,
}

impl TournamentState {
    /// Completed and Cancelled accept no further mutation
    pub fn is_terminal(self) -> bool {
        matches!(self, TournamentState::Completed | TournamentState::Cancelled)
    }

    /// Whether the lifecycle allows moving from `self` to `next`
    pub fn can_transition_to(self, next: TournamentState) -> bool {
        use TournamentState::*;
        matches!(
            (self, next),
            (Created, Registering)
                | (Registering, InProgress)
                | (InProgress, Completed)
                | (Created, Cancelled)
                | (Registering, Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TournamentState::Created => "created",
            TournamentState::Registering => "registering",
            TournamentState::InProgress => "in_progress",
            TournamentState::Completed => "completed",
            TournamentState::Cancelled => "cancelled",
        }
    }
}

/// Per-tournament settings fixed at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Display name
    pub name: String,
    /// Participants required before the tournament can start
    pub min_participants: usize,
    /// Roster cap, unlimited when `None`
    pub max_participants: Option<usize>,
}

impl TournamentConfig {
    pub fn new(name: impl Into<String>, min_participants: usize) -> Self {
        Self {
            name: name.into(),
            min_participants,
            max_participants: None,
        }
    }

    pub fn with_max_participants(mut self, max_participants: usize) -> Self {
        self.max_participants = Some(max_participants);
        self
    }

    pub fn validate(&self) -> TournamentResult<()> {
        if self.min_participants == 0 {
            return Err(TournamentError::InvalidConfig(
                "min_participants must be at least 1".to_string(),
            ));
        }

        if let Some(max) = self.max_participants {
            if max < self.min_participants {
                return Err(TournamentError::InvalidConfig(format!(
                    "max_participants ({}) is below min_participants ({})",
                    max, self.min_participants
                )));
            }
        }

        Ok(())
    }
}

/// Reference into the oracle for the result a tournament was finalized with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRef {
    pub key: OutcomeKey,
    /// Oracle sequence number of the referenced record
    pub sequence: u64,
}

/// Tournament record owned by the manager
#[derive(Debug, Clone)]
pub(crate) struct Tournament {
    pub id: TournamentId,
    pub organizer: Identity,
    pub delegates: HashSet<Identity>,
    pub config: TournamentConfig,
    pub state: TournamentState,
    /// Registration order
    pub participants: Vec<Identity>,
    /// Membership index over `participants`
    pub members: HashSet<Identity>,
    pub result_ref: Option<ResultRef>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Tournament {
    pub fn new(id: TournamentId, organizer: Identity, config: TournamentConfig) -> Self {
        Self {
            id,
            organizer,
            delegates: HashSet::new(),
            config,
            state: TournamentState::Created,
            participants: Vec::new(),
            members: HashSet::new(),
            result_ref: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Organizer or a delegate
    pub fn is_admin(&self, identity: &Identity) -> bool {
        self.organizer == *identity || self.delegates.contains(identity)
    }

    /// Move to `next`, or fail without touching the record
    pub fn advance(&mut self, next: TournamentState, operation: &'static str) -> TournamentResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(self.invalid_transition(operation));
        }
        self.state = next;
        Ok(())
    }

    pub fn invalid_transition(&self, operation: &'static str) -> TournamentError {
        TournamentError::InvalidStateTransition {
            id: self.id,
            state: self.state,
            operation,
        }
    }

    pub fn info(&self) -> TournamentInfo {
        let mut delegates: Vec<Identity> = self.delegates.iter().cloned().collect();
        delegates.sort();

        TournamentInfo {
            id: self.id,
            organizer: self.organizer.clone(),
            delegates,
            config: self.config.clone(),
            state: self.state,
            participants: self.participants.clone(),
            result_ref: self.result_ref.clone(),
            created_at: self.created_at,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// Read view of a tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentInfo {
    pub id: TournamentId,
    pub organizer: Identity,
    /// Identities holding delegated admin rights, sorted
    pub delegates: Vec<Identity>,
    pub config: TournamentConfig,
    pub state: TournamentState,
    /// Participants in registration order
    pub participants: Vec<Identity>,
    pub result_ref: Option<ResultRef>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// One page of a roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantPage {
    pub participants: Vec<Identity>,
    /// Offset of the next page, `None` on the last page
    pub next_offset: Option<usize>,
    /// Roster size when the page was read
    pub total: usize,
}

/// Notifications published by the manager after each successful change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TournamentEvent {
    Created {
        id: TournamentId,
        organizer: Identity,
    },
    RegistrationOpened {
        id: TournamentId,
    },
    ParticipantRegistered {
        id: TournamentId,
        participant: Identity,
    },
    Started {
        id: TournamentId,
    },
    Completed {
        id: TournamentId,
        result_ref: ResultRef,
    },
    Cancelled {
        id: TournamentId,
    },
}
