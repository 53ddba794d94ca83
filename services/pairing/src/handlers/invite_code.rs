use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use couplet_core::identity::Identity;

use crate::error::PairingServiceError;
use crate::state::AppState;
use crate::usecase::invite_code::{
    CreateInviteCodeUseCase, GetActiveInviteCodeUseCase, RegenerateInviteCodeUseCase,
};

#[derive(Serialize)]
pub struct InviteCodeResponse {
    pub code: String,
    #[serde(serialize_with = "couplet_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

// ── POST /invite-codes ───────────────────────────────────────────────────────

pub async fn create_invite_code(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<InviteCodeResponse>), PairingServiceError> {
    let usecase = CreateInviteCodeUseCase {
        codes: state.invite_code_repo(),
    };
    let issued = usecase.execute(identity.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(InviteCodeResponse {
            code: issued.code,
            expires_at: issued.expires_at,
        }),
    ))
}

// ── GET /invite-codes/active ─────────────────────────────────────────────────

pub async fn get_active_invite_code(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<InviteCodeResponse>, PairingServiceError> {
    let usecase = GetActiveInviteCodeUseCase {
        codes: state.invite_code_repo(),
    };
    let code = usecase.execute(identity.user_id).await?;
    Ok(Json(InviteCodeResponse {
        code: code.code,
        expires_at: code.expires_at,
    }))
}

// ── POST /invite-codes/regenerate ────────────────────────────────────────────

pub async fn regenerate_invite_code(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<InviteCodeResponse>), PairingServiceError> {
    let usecase = RegenerateInviteCodeUseCase {
        codes: state.invite_code_repo(),
    };
    let issued = usecase.execute(identity.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(InviteCodeResponse {
            code: issued.code,
            expires_at: issued.expires_at,
        }),
    ))
}
