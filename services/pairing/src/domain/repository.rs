#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{Couple, InviteCode, Profile};
use crate::error::PairingServiceError;

/// Repository for user profiles.
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, PairingServiceError>;

    /// Create the profile row on first authentication, or refresh the email
    /// and `updated_at` if it already exists. Never touches nickname, avatar
    /// or pairing state.
    async fn upsert_identity(&self, id: Uuid, email: &str) -> Result<(), PairingServiceError>;

    async fn update_profile(
        &self,
        id: Uuid,
        nickname: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<(), PairingServiceError>;
}

/// Repository for invite codes.
pub trait InviteCodeRepository: Send + Sync {
    /// Insert a freshly generated code. Returns `false` on a code-string
    /// collision (unique constraint), letting the caller retry with a new one.
    async fn create(&self, code: &InviteCode) -> Result<bool, PairingServiceError>;

    /// Newest unused, unexpired code for a creator.
    async fn find_active_by_creator(
        &self,
        creator_id: Uuid,
    ) -> Result<Option<InviteCode>, PairingServiceError>;

    /// Unused row matching this code string, regardless of expiry — the
    /// caller reports expiry as a distinct rejection.
    async fn find_unused_by_code(
        &self,
        code: &str,
    ) -> Result<Option<InviteCode>, PairingServiceError>;

    /// Flag every unused code by this creator as used (regeneration).
    /// Returns the number of codes invalidated.
    async fn invalidate_all(&self, creator_id: Uuid) -> Result<u64, PairingServiceError>;
}

/// Repository for couples, including the pairing critical section.
pub trait CoupleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Couple>, PairingServiceError>;

    /// Atomically consume the invite code and form the couple: one
    /// transaction that compare-and-swaps the code row to used, inserts the
    /// couple, and back-fills both members' `couple_id` with
    /// still-unpaired conditions. Any condition failing rolls the whole
    /// thing back and surfaces as the matching rejection, so two joiners
    /// racing on one code produce exactly one couple.
    async fn redeem(
        &self,
        code_id: Uuid,
        creator_id: Uuid,
        joiner_id: Uuid,
    ) -> Result<Couple, PairingServiceError>;

    /// Clear both members' `couple_id` and delete the couple row in one
    /// transaction. Returns `false` if the couple row was already gone.
    async fn dissolve(&self, couple_id: Uuid) -> Result<bool, PairingServiceError>;
}
