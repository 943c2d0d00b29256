//! Outcome records and events stored by the results oracle.

use crate::ids::{Identity, TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};

/// Key of an outcome record: a whole tournament or one match inside it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutcomeKey {
    pub tournament: TournamentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<String>,
}

impl OutcomeKey {
    /// Key of the overall tournament result, the one `finalize` reads
    pub fn tournament(tournament: TournamentId) -> Self {
        Self {
            tournament,
            match_id: None,
        }
    }

    /// Key of a single match within a tournament
    pub fn match_in(tournament: TournamentId, match_id: impl Into<String>) -> Self {
        Self {
            tournament,
            match_id: Some(match_id.into()),
        }
    }

    pub fn is_tournament_level(&self) -> bool {
        self.match_id.is_none()
    }
}

impl fmt::Display for OutcomeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.match_id {
            Some(match_id) => write!(f, "tournament {}/match {}", self.tournament, match_id),
            None => write!(f, "tournament {}", self.tournament),
        }
    }
}

/// Attested result data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutcomePayload {
    /// Single winner
    Winner { winner: Identity },
    /// Full standings, first entry is the winner
    Ranking { ranking: Vec<Identity> },
}

impl OutcomePayload {
    pub fn winner(&self) -> Option<&Identity> {
        match self {
            OutcomePayload::Winner { winner } => Some(winner),
            OutcomePayload::Ranking { ranking } => ranking.first(),
        }
    }

    /// A ranking must name at least one participant, each at most once
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            OutcomePayload::Winner { .. } => Ok(()),
            OutcomePayload::Ranking { ranking } if ranking.is_empty() => {
                Err("ranking names no participant")
            }
            OutcomePayload::Ranking { ranking } => {
                let unique: HashSet<&Identity> = ranking.iter().collect();
                if unique.len() == ranking.len() {
                    Ok(())
                } else {
                    Err("ranking lists a participant more than once")
                }
            }
        }
    }
}

/// A submitted, attested outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub key: OutcomeKey,
    /// Reporter that submitted the record
    pub reporter: Identity,
    pub payload: OutcomePayload,
    /// Oracle-wide submission order, starting at 1
    pub sequence: u64,
    pub submitted_at: DateTime<Utc>,
    /// Immutable once true
    pub finalized: bool,
}

/// Acknowledgement returned for an accepted submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeReceipt {
    pub key: OutcomeKey,
    pub sequence: u64,
}

/// Notifications published by the oracle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OracleEvent {
    ResultRecorded {
        key: OutcomeKey,
        reporter: Identity,
        sequence: u64,
    },
    ReporterAdded {
        reporter: Identity,
    },
    ReporterRemoved {
        reporter: Identity,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        let id = TournamentId::new(3);
        assert_eq!(OutcomeKey::tournament(id).to_string(), "tournament 3");
        assert_eq!(
            OutcomeKey::match_in(id, "semi-1").to_string(),
            "tournament 3/match semi-1"
        );
    }

    #[test]
    fn test_ranking_winner_is_first_entry() {
        let payload = OutcomePayload::Ranking {
            ranking: vec![Identity::from("p2"), Identity::from("p1")],
        };
        assert_eq!(payload.winner(), Some(&Identity::from("p2")));

        let empty = OutcomePayload::Ranking { ranking: vec![] };
        assert_eq!(empty.winner(), None);
    }

    #[test]
    fn test_payload_json_shape() {
        let payload: OutcomePayload =
            serde_json::from_str(r#"{"type":"winner","winner":"p1"}"#).unwrap();
        assert_eq!(
            payload,
            OutcomePayload::Winner {
                winner: Identity::from("p1")
            }
        );
    }

    #[test]
    fn test_tournament_key_omits_match_id() {
        let key = OutcomeKey::tournament(TournamentId::new(1));
        assert_eq!(serde_json::to_string(&key).unwrap(), r#"{"tournament":1}"#);
        assert!(key.is_tournament_level());
    }
}
