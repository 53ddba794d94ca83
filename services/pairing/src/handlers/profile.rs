use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use couplet_core::identity::Identity;

use crate::error::PairingServiceError;
use crate::state::AppState;
use crate::usecase::profile::{
    EnsureProfileUseCase, GetProfileUseCase, UpdateProfileInput, UpdateProfileUseCase,
};

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct EnsureProfileRequest {
    pub email: String,
}

pub async fn ensure_profile(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<EnsureProfileRequest>,
) -> Result<StatusCode, PairingServiceError> {
    let usecase = EnsureProfileUseCase {
        repo: state.profile_repo(),
    };
    usecase.execute(identity.user_id, &body.email).await?;
    Ok(StatusCode::CREATED)
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    pub couple_id: Option<String>,
    #[serde(serialize_with = "couplet_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "couplet_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, PairingServiceError> {
    let usecase = GetProfileUseCase {
        repo: state.profile_repo(),
    };
    let profile = usecase.execute(identity.user_id).await?;
    Ok(Json(ProfileResponse {
        id: profile.id.to_string(),
        email: profile.email,
        nickname: profile.nickname,
        avatar_url: profile.avatar_url,
        couple_id: profile.couple_id.map(|id| id.to_string()),
        created_at: profile.created_at,
        updated_at: profile.updated_at,
    }))
}

// ── PATCH /users/@me ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn update_me(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<StatusCode, PairingServiceError> {
    let usecase = UpdateProfileUseCase {
        repo: state.profile_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            UpdateProfileInput {
                nickname: body.nickname,
                avatar_url: body.avatar_url,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
