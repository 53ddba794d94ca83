use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::InviteCodeRepository;
use crate::domain::types::{
    INVITE_CODE_LEN, INVITE_CODE_TTL_HOURS, InviteCode, MAX_CODE_GENERATION_ATTEMPTS,
};
use crate::error::PairingServiceError;

/// Charset for generated invite codes (uppercase alphanumeric, human-typeable).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..INVITE_CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

#[derive(Debug)]
pub struct IssuedCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Generate and persist a fresh code, retrying on code-string collision.
async fn issue_code<R: InviteCodeRepository>(
    codes: &R,
    creator_id: Uuid,
) -> Result<IssuedCode, PairingServiceError> {
    for _ in 0..MAX_CODE_GENERATION_ATTEMPTS {
        let now = Utc::now();
        let code = InviteCode {
            id: Uuid::now_v7(),
            code: generate_code(),
            created_by: creator_id,
            used: false,
            used_by: None,
            expires_at: now + Duration::hours(INVITE_CODE_TTL_HOURS),
            created_at: now,
        };
        if codes.create(&code).await? {
            return Ok(IssuedCode {
                code: code.code,
                expires_at: code.expires_at,
            });
        }
    }
    tracing::error!(%creator_id, "exhausted invite code generation attempts");
    Err(PairingServiceError::CodeGeneration)
}

// ── CreateInviteCode ─────────────────────────────────────────────────────────

pub struct CreateInviteCodeUseCase<R: InviteCodeRepository> {
    pub codes: R,
}

impl<R: InviteCodeRepository> CreateInviteCodeUseCase<R> {
    pub async fn execute(&self, creator_id: Uuid) -> Result<IssuedCode, PairingServiceError> {
        issue_code(&self.codes, creator_id).await
    }
}

// ── GetActiveInviteCode ──────────────────────────────────────────────────────

pub struct GetActiveInviteCodeUseCase<R: InviteCodeRepository> {
    pub codes: R,
}

impl<R: InviteCodeRepository> GetActiveInviteCodeUseCase<R> {
    /// Newest unused, unexpired code for the caller. Absence and read failure
    /// are distinct outcomes: `NoActiveCode` vs `Internal`.
    pub async fn execute(&self, creator_id: Uuid) -> Result<InviteCode, PairingServiceError> {
        self.codes
            .find_active_by_creator(creator_id)
            .await?
            .ok_or(PairingServiceError::NoActiveCode)
    }
}

// ── RegenerateInviteCode ─────────────────────────────────────────────────────

pub struct RegenerateInviteCodeUseCase<R: InviteCodeRepository> {
    pub codes: R,
}

impl<R: InviteCodeRepository> RegenerateInviteCodeUseCase<R> {
    /// Invalidate every unused code by the caller, then issue a fresh one.
    /// Afterwards exactly one active code exists and every prior code fails
    /// redemption.
    pub async fn execute(&self, creator_id: Uuid) -> Result<IssuedCode, PairingServiceError> {
        let invalidated = self.codes.invalidate_all(creator_id).await?;
        tracing::debug!(%creator_id, invalidated, "invalidated unused invite codes");
        issue_code(&self.codes, creator_id).await
    }
}
