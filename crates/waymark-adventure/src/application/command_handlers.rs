//! Command handlers for the adventure context.
//!
//! Each handler orchestrates one turn: load the adventure, load the stored
//! position, let the dialogue engine decide, then persist the new position.

use std::time::Instant;

use tracing::{info, instrument, warn};
use waymark_core::error::DomainError;
use waymark_core::position::SessionPositionStore;
use waymark_core::session::SessionKey;

use crate::domain::commands::{ApplyIntent, LaunchAdventure, ProcessSkillRequest};
use crate::domain::dialogue::DialogueEngine;
use crate::domain::loader::AdventureLoader;
use crate::domain::request::{IntentKind, SkillRequest};
use crate::domain::response::SkillResponse;

/// What happened to the stored position during a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionWrite {
    /// The position was written.
    Persisted {
        /// The node name now stored.
        node_name: String,
    },
    /// Nothing needed writing (launch, ping, lifecycle, or no known node).
    Skipped,
    /// The write failed. The response is still valid; the user may lose
    /// their place.
    Failed {
        /// The node name that should have been stored.
        node_name: String,
        /// Why the store rejected the write.
        reason: String,
    },
}

/// Result of a successfully handled turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The response to return to the caller.
    pub response: SkillResponse,
    /// Whether the position was persisted.
    pub position: PositionWrite,
}

impl TurnOutcome {
    fn unpersisted(response: SkillResponse) -> Self {
        Self {
            response,
            position: PositionWrite::Skipped,
        }
    }
}

/// Dispatches any inbound request by category.
///
/// Pings and lifecycle events are acknowledged without touching storage.
///
/// # Errors
///
/// Returns `DomainError` from the launch and intent handlers.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_skill_request(
    command: &ProcessSkillRequest,
    media_base_path: &str,
    loader: &dyn AdventureLoader,
    store: &dyn SessionPositionStore,
) -> Result<TurnOutcome, DomainError> {
    let started = Instant::now();

    let outcome = match &command.request {
        SkillRequest::Ping => {
            info!("ping request");
            TurnOutcome::unpersisted(SkillResponse::acknowledgement())
        }
        SkillRequest::Lifecycle(event) => {
            info!(?event, "lifecycle event");
            TurnOutcome::unpersisted(SkillResponse::acknowledgement())
        }
        SkillRequest::Launch { session_key } => {
            let launch = LaunchAdventure {
                correlation_id: command.correlation_id,
                session_key: session_key.clone(),
            };
            handle_launch(&launch, media_base_path, loader, store).await?
        }
        SkillRequest::Intent {
            session_key,
            intent_name,
        } => {
            let apply = ApplyIntent {
                correlation_id: command.correlation_id,
                session_key: session_key.clone(),
                intent_name: intent_name.clone(),
            };
            handle_apply_intent(&apply, media_base_path, loader, store).await?
        }
    };

    info!(
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "skill request processed"
    );
    Ok(outcome)
}

/// Handles a launch: welcomes new users, offers resume-or-restart to users
/// whose stored node still has choices. Never writes the position.
///
/// # Errors
///
/// Returns `DomainError` if the adventure or the stored position cannot be
/// loaded.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, session_key = %command.session_key))]
pub async fn handle_launch(
    command: &LaunchAdventure,
    media_base_path: &str,
    loader: &dyn AdventureLoader,
    store: &dyn SessionPositionStore,
) -> Result<TurnOutcome, DomainError> {
    let adventure = loader.load_adventure().await?;
    let stored = store
        .load_position(adventure.id(), &command.session_key)
        .await?;

    let engine = DialogueEngine::new(&adventure, media_base_path);
    let current = engine.current_node(stored.as_ref().map(|p| p.node_name.as_str()));

    info!(
        current_node = current.map(|n| n.name.as_str()),
        "handling launch"
    );
    Ok(TurnOutcome::unpersisted(engine.launch(current)))
}

/// Handles an intent: resolves the transition from the current node, then
/// stores the destination, or re-stores the current node when staying.
///
/// A failed write is reported in [`TurnOutcome::position`] rather than as an
/// error.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the intent name is blank,
/// `DomainError::GraphConfiguration` if a required role node is broken, and
/// `DomainError::StorageUnavailable`/`MalformedAdventure` if loading fails.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id, session_key = %command.session_key))]
pub async fn handle_apply_intent(
    command: &ApplyIntent,
    media_base_path: &str,
    loader: &dyn AdventureLoader,
    store: &dyn SessionPositionStore,
) -> Result<TurnOutcome, DomainError> {
    let intent_name = command.intent_name.trim();
    if intent_name.is_empty() {
        return Err(DomainError::Validation("no intent name found".to_owned()));
    }

    let adventure = loader.load_adventure().await?;
    let stored = store
        .load_position(adventure.id(), &command.session_key)
        .await?;

    let engine = DialogueEngine::new(&adventure, media_base_path);
    let current = engine.current_node(stored.as_ref().map(|p| p.node_name.as_str()));

    let intent = IntentKind::classify(intent_name);
    info!(
        intent = intent_name,
        ?intent,
        current_node = current.map(|n| n.name.as_str()),
        "handling intent"
    );

    let transition = engine.apply(&intent, current)?;

    let target = transition
        .next_node
        .or_else(|| current.map(|n| n.name.clone()));
    let position = match target {
        None => PositionWrite::Skipped,
        Some(node_name) => {
            persist(store, adventure.id(), &command.session_key, node_name).await
        }
    };

    Ok(TurnOutcome {
        response: transition.response,
        position,
    })
}

async fn persist(
    store: &dyn SessionPositionStore,
    adventure_id: &str,
    session_key: &SessionKey,
    node_name: String,
) -> PositionWrite {
    match store
        .save_position(adventure_id, session_key, &node_name)
        .await
    {
        Ok(()) => PositionWrite::Persisted { node_name },
        Err(e) => {
            warn!(
                node_name = %node_name,
                error = %e,
                "failed to persist session position"
            );
            PositionWrite::Failed {
                node_name,
                reason: e.to_string(),
            }
        }
    }
}
