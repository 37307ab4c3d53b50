//! Routes for the adventure skill endpoint.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use waymark_adventure::application::command_handlers::{self, PositionWrite};
use waymark_adventure::application::query_handlers::{self, PositionView};
use waymark_adventure::domain::commands::ProcessSkillRequest;
use waymark_adventure::domain::response::SkillResponse;
use waymark_core::session::SessionKey;

use crate::envelope::RequestEnvelope;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /skill
#[instrument(skip_all)]
async fn handle_skill(
    State(state): State<AppState>,
    Json(envelope): Json<RequestEnvelope>,
) -> Result<Json<SkillResponse>, ApiError> {
    let command = ProcessSkillRequest {
        correlation_id: Uuid::new_v4(),
        request: envelope.into_skill_request()?,
    };

    info!(correlation_id = %command.correlation_id, "handling skill request");

    let outcome = command_handlers::handle_skill_request(
        &command,
        &state.media_base_url,
        state.adventure_loader.as_ref(),
        state.position_store.as_ref(),
    )
    .await?;

    if let PositionWrite::Failed { node_name, reason } = &outcome.position {
        warn!(
            correlation_id = %command.correlation_id,
            %node_name,
            %reason,
            "responding although the position was not saved"
        );
    }

    Ok(Json(outcome.response))
}

/// GET /positions/{session_key}
#[instrument(skip(state))]
async fn get_position(
    State(state): State<AppState>,
    Path(session_key): Path<String>,
) -> Result<Json<PositionView>, ApiError> {
    let view = query_handlers::get_position(
        &SessionKey::new(session_key),
        state.adventure_loader.as_ref(),
        state.position_store.as_ref(),
    )
    .await?;

    Ok(Json(view))
}

/// Returns the router for the adventure skill.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/skill", post(handle_skill))
        .route("/positions/{session_key}", get(get_position))
}
