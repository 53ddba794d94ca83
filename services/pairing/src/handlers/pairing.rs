use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use couplet_core::identity::Identity;

use crate::error::PairingServiceError;
use crate::state::AppState;
use crate::usecase::pairing::{ConnectWithCodeInput, ConnectWithCodeUseCase};

// ── POST /pairing ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ConnectRequest {
    pub code: String,
}

#[derive(Serialize)]
pub struct ConnectResponse {
    pub couple_id: String,
}

pub async fn connect_with_code(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<ConnectRequest>,
) -> Result<(StatusCode, Json<ConnectResponse>), PairingServiceError> {
    let usecase = ConnectWithCodeUseCase {
        profiles: state.profile_repo(),
        codes: state.invite_code_repo(),
        couples: state.couple_repo(),
    };
    let output = usecase
        .execute(identity.user_id, ConnectWithCodeInput { code: body.code })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ConnectResponse {
            couple_id: output.couple_id.to_string(),
        }),
    ))
}
