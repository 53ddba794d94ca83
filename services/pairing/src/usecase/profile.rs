use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{CoupleRepository, ProfileRepository};
use crate::domain::types::{Couple, Profile, days_together};
use crate::error::PairingServiceError;

/// Maximum nickname length in characters.
pub const NICKNAME_MAX_LEN: usize = 20;

pub fn validate_nickname(nickname: &str) -> bool {
    let trimmed = nickname.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= NICKNAME_MAX_LEN
}

// ── EnsureProfile ────────────────────────────────────────────────────────────

/// Idempotent first-authentication row creation.
pub struct EnsureProfileUseCase<R: ProfileRepository> {
    pub repo: R,
}

impl<R: ProfileRepository> EnsureProfileUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, email: &str) -> Result<(), PairingServiceError> {
        if email.trim().is_empty() {
            return Err(PairingServiceError::MissingData);
        }
        self.repo.upsert_identity(user_id, email.trim()).await
    }
}

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<R: ProfileRepository> {
    pub repo: R,
}

impl<R: ProfileRepository> GetProfileUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Profile, PairingServiceError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(PairingServiceError::UserNotFound)
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileInput {
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
}

pub struct UpdateProfileUseCase<R: ProfileRepository> {
    pub repo: R,
}

impl<R: ProfileRepository> UpdateProfileUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<(), PairingServiceError> {
        if input.nickname.is_none() && input.avatar_url.is_none() {
            return Err(PairingServiceError::MissingData);
        }
        if let Some(ref nickname) = input.nickname {
            if !validate_nickname(nickname) {
                return Err(PairingServiceError::InvalidNickname);
            }
        }
        self.repo
            .update_profile(
                user_id,
                input.nickname.as_deref().map(str::trim),
                input.avatar_url.as_deref(),
            )
            .await
    }
}

// ── GetCoupleSummary ─────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct CoupleSummary {
    pub couple: Couple,
    /// Missing partner rows are tolerated (account deleted mid-pairing).
    pub partner: Option<Profile>,
    pub days_count: i64,
}

pub struct GetCoupleSummaryUseCase<P, C>
where
    P: ProfileRepository,
    C: CoupleRepository,
{
    pub profiles: P,
    pub couples: C,
}

impl<P, C> GetCoupleSummaryUseCase<P, C>
where
    P: ProfileRepository,
    C: CoupleRepository,
{
    pub async fn execute(&self, user_id: Uuid) -> Result<CoupleSummary, PairingServiceError> {
        let me = self
            .profiles
            .find_by_id(user_id)
            .await?
            .ok_or(PairingServiceError::UserNotFound)?;
        let couple_id = me.couple_id.ok_or(PairingServiceError::NotPaired)?;

        let Some(couple) = self.couples.find_by_id(couple_id).await? else {
            // couple_id pointing at a missing row breaks the bidirectional
            // invariant; report as unpaired rather than crash.
            tracing::warn!(%couple_id, "profile references a missing couple row");
            return Err(PairingServiceError::NotPaired);
        };

        let partner = self.profiles.find_by_id(couple.partner_of(user_id)).await?;
        let days_count = days_together(couple.start_date, Utc::now());

        Ok(CoupleSummary {
            couple,
            partner,
            days_count,
        })
    }
}
