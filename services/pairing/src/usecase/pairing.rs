use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{CoupleRepository, InviteCodeRepository, ProfileRepository};
use crate::error::PairingServiceError;

// ── ConnectWithCode ──────────────────────────────────────────────────────────

pub struct ConnectWithCodeInput {
    pub code: String,
}

#[derive(Debug)]
pub struct ConnectWithCodeOutput {
    pub couple_id: Uuid,
}

/// The pairing critical section: validates the submitted code, checks both
/// parties' eligibility, then hands off to the atomic redeem transaction.
pub struct ConnectWithCodeUseCase<P, I, C>
where
    P: ProfileRepository,
    I: InviteCodeRepository,
    C: CoupleRepository,
{
    pub profiles: P,
    pub codes: I,
    pub couples: C,
}

impl<P, I, C> ConnectWithCodeUseCase<P, I, C>
where
    P: ProfileRepository,
    I: InviteCodeRepository,
    C: CoupleRepository,
{
    pub async fn execute(
        &self,
        joiner_id: Uuid,
        input: ConnectWithCodeInput,
    ) -> Result<ConnectWithCodeOutput, PairingServiceError> {
        // 1. An unused row must exist for the submitted code.
        let code = self
            .codes
            .find_unused_by_code(input.code.trim())
            .await?
            .ok_or(PairingServiceError::InvalidCode)?;

        // 2. Lazy expiry check, distinct from "no such code".
        if code.expires_at <= Utc::now() {
            return Err(PairingServiceError::ExpiredCode);
        }

        // 3. Self-pairing is forbidden.
        if code.created_by == joiner_id {
            return Err(PairingServiceError::OwnCode);
        }

        // 4. Creator must still be unpaired.
        let creator = self
            .profiles
            .find_by_id(code.created_by)
            .await?
            .ok_or(PairingServiceError::UserNotFound)?;
        if creator.couple_id.is_some() {
            return Err(PairingServiceError::CreatorAlreadyPaired);
        }

        // 5. Joiner must still be unpaired.
        let joiner = self
            .profiles
            .find_by_id(joiner_id)
            .await?
            .ok_or(PairingServiceError::UserNotFound)?;
        if joiner.couple_id.is_some() {
            return Err(PairingServiceError::AlreadyPaired);
        }

        // All five preconditions are re-checked by the transaction's
        // conditional writes; losing a race surfaces as a rejection here,
        // never as a half-applied pairing.
        let couple = self
            .couples
            .redeem(code.id, code.created_by, joiner_id)
            .await?;

        tracing::info!(couple_id = %couple.id, "couple formed");
        Ok(ConnectWithCodeOutput {
            couple_id: couple.id,
        })
    }
}

// ── Breakup ──────────────────────────────────────────────────────────────────

pub struct BreakupUseCase<P, C>
where
    P: ProfileRepository,
    C: CoupleRepository,
{
    pub profiles: P,
    pub couples: C,
}

impl<P, C> BreakupUseCase<P, C>
where
    P: ProfileRepository,
    C: CoupleRepository,
{
    pub async fn execute(&self, user_id: Uuid) -> Result<(), PairingServiceError> {
        let me = self
            .profiles
            .find_by_id(user_id)
            .await?
            .ok_or(PairingServiceError::UserNotFound)?;
        let couple_id = me.couple_id.ok_or(PairingServiceError::NotPaired)?;

        let existed = self.couples.dissolve(couple_id).await?;
        if !existed {
            // Both members' couple_id were cleared regardless; the row was
            // likely removed by the partner's concurrent breakup.
            tracing::warn!(%couple_id, "dissolved couple row was already gone");
        }
        Ok(())
    }
}
