//! Background audit of oracle and tournament events.
//!
//! Every accepted result and every lifecycle transition is counted from the
//! broadcast channels, so handlers never have to remember to do it. The
//! library already logs these at info level; the recorder adds a debug trace
//! only.

use tokio::{sync::broadcast, task::JoinHandle};
use tournament_oracle::{
    oracle::OracleEvent,
    tournament::{TournamentEvent, TournamentState},
};

use crate::metrics;

/// Spawn the event recorder. The task ends once both channels are closed.
pub fn spawn_event_recorder(
    mut oracle_events: broadcast::Receiver<OracleEvent>,
    mut tournament_events: broadcast::Receiver<TournamentEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut oracle_open = true;
        let mut tournaments_open = true;

        while oracle_open || tournaments_open {
            tokio::select! {
                event = oracle_events.recv(), if oracle_open => match event {
                    Ok(event) => record_oracle_event(&event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event recorder lagged behind the oracle");
                    }
                    Err(broadcast::error::RecvError::Closed) => oracle_open = false,
                },
                event = tournament_events.recv(), if tournaments_open => match event {
                    Ok(event) => record_tournament_event(&event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event recorder lagged behind the manager");
                    }
                    Err(broadcast::error::RecvError::Closed) => tournaments_open = false,
                },
            }
        }

        tracing::debug!("Event recorder stopped");
    })
}

fn record_oracle_event(event: &OracleEvent) {
    match event {
        OracleEvent::ResultRecorded {
            key,
            reporter,
            sequence,
        } => {
            tracing::debug!(%key, %reporter, sequence, "Result recorded");
        }
        OracleEvent::ReporterAdded { reporter } => {
            tracing::debug!(%reporter, "Reporter authorized");
        }
        OracleEvent::ReporterRemoved { reporter } => {
            tracing::debug!(%reporter, "Reporter revoked");
        }
    }
}

fn record_tournament_event(event: &TournamentEvent) {
    match event {
        TournamentEvent::Created { id, organizer } => {
            tracing::debug!(%id, %organizer, "Tournament created");
            metrics::tournament_transition(TournamentState::Created.as_str());
        }
        TournamentEvent::RegistrationOpened { id } => {
            tracing::debug!(%id, "Registration opened");
            metrics::tournament_transition(TournamentState::Registering.as_str());
        }
        TournamentEvent::ParticipantRegistered { id, participant } => {
            tracing::debug!(%id, %participant, "Participant registered");
            metrics::participant_registered();
        }
        TournamentEvent::Started { id } => {
            tracing::debug!(%id, "Tournament started");
            metrics::tournament_transition(TournamentState::InProgress.as_str());
        }
        TournamentEvent::Completed { id, result_ref } => {
            tracing::debug!(%id, key = %result_ref.key, sequence = result_ref.sequence, "Tournament completed");
            metrics::tournament_transition(TournamentState::Completed.as_str());
        }
        TournamentEvent::Cancelled { id } => {
            tracing::debug!(%id, "Tournament cancelled");
            metrics::tournament_transition(TournamentState::Cancelled.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::task::yield_now;
    use tournament_oracle::{Identity, TournamentId};

    async fn settle() {
        for _ in 0..8 {
            yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_recorder_survives_lag_and_stops_when_both_channels_close() {
        let (oracle_tx, oracle_rx) = broadcast::channel(1);
        let (tournament_tx, tournament_rx) = broadcast::channel(1);
        let handle = spawn_event_recorder(oracle_rx, tournament_rx);

        // Capacity 1: the recorder sees Lagged(2) before the last event
        for n in 0..3 {
            oracle_tx
                .send(OracleEvent::ReporterAdded {
                    reporter: Identity::new(format!("reporter-{n}")),
                })
                .unwrap();
        }
        for n in 0..3 {
            tournament_tx
                .send(TournamentEvent::RegistrationOpened {
                    id: TournamentId::new(n),
                })
                .unwrap();
        }
        settle().await;
        assert!(!handle.is_finished());

        drop(oracle_tx);
        settle().await;
        assert!(!handle.is_finished(), "one open channel keeps the recorder alive");

        tournament_tx
            .send(TournamentEvent::Started {
                id: TournamentId::new(1),
            })
            .unwrap();
        drop(tournament_tx);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("recorder should stop once both channels close")
            .unwrap();
    }
}
