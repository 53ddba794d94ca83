use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use couplet_core::identity::Identity;

use crate::error::PairingServiceError;
use crate::state::AppState;
use crate::usecase::pairing::BreakupUseCase;
use crate::usecase::profile::GetCoupleSummaryUseCase;

// ── GET /couple ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PartnerResponse {
    pub id: String,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Serialize)]
pub struct CoupleSummaryResponse {
    pub id: String,
    pub couple_name: Option<String>,
    #[serde(serialize_with = "couplet_core::serde::to_rfc3339_ms")]
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub days_count: i64,
    pub partner: Option<PartnerResponse>,
}

pub async fn get_couple(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<CoupleSummaryResponse>, PairingServiceError> {
    let usecase = GetCoupleSummaryUseCase {
        profiles: state.profile_repo(),
        couples: state.couple_repo(),
    };
    let summary = usecase.execute(identity.user_id).await?;
    Ok(Json(CoupleSummaryResponse {
        id: summary.couple.id.to_string(),
        couple_name: summary.couple.couple_name,
        start_date: summary.couple.start_date,
        days_count: summary.days_count,
        partner: summary.partner.map(|p| PartnerResponse {
            id: p.id.to_string(),
            nickname: p.nickname,
            avatar_url: p.avatar_url,
        }),
    }))
}

// ── DELETE /couple ───────────────────────────────────────────────────────────

pub async fn breakup(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<StatusCode, PairingServiceError> {
    let usecase = BreakupUseCase {
        profiles: state.profile_repo(),
        couples: state.couple_repo(),
    };
    usecase.execute(identity.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
