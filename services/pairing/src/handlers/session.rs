use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use couplet_core::identity::Identity;

use crate::error::PairingServiceError;
use crate::state::AppState;
use crate::usecase::session::ResolveGateUseCase;

// ── GET /session/gate ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct GateProfileResponse {
    pub id: String,
    pub nickname: Option<String>,
    pub couple_id: Option<String>,
}

#[derive(Serialize)]
pub struct GateResponse {
    pub state: &'static str,
    pub profile: Option<GateProfileResponse>,
}

pub async fn resolve_gate(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<GateResponse>, PairingServiceError> {
    let usecase = ResolveGateUseCase {
        profiles: state.profile_repo(),
        flight: Arc::clone(&state.profile_flight),
        grace: Arc::clone(&state.grace),
    };
    let decision = usecase.execute(identity.user_id).await?;
    Ok(Json(GateResponse {
        state: decision.state.as_str(),
        profile: decision.profile.map(|p| GateProfileResponse {
            id: p.id.to_string(),
            nickname: p.nickname,
            couple_id: p.couple_id.map(|id| id.to_string()),
        }),
    }))
}
