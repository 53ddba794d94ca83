use chrono::{DateTime, Utc};
use uuid::Uuid;

/// User profile row. `nickname` is unset until onboarding completes;
/// `couple_id` until a pairing succeeds.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    pub couple_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Onboarding is complete once a non-blank nickname is set.
    pub fn has_nickname(&self) -> bool {
        self.nickname
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty())
    }
}

/// Couple record jointly owned by its two members.
#[derive(Debug, Clone)]
pub struct Couple {
    pub id: Uuid,
    pub user1_id: Uuid,
    pub user2_id: Uuid,
    pub couple_name: Option<String>,
    pub start_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Couple {
    pub fn partner_of(&self, user_id: Uuid) -> Uuid {
        if self.user1_id == user_id {
            self.user2_id
        } else {
            self.user1_id
        }
    }
}

/// Invite code issued by one user for a prospective partner to redeem.
#[derive(Debug, Clone)]
pub struct InviteCode {
    pub id: Uuid,
    pub code: String,
    pub created_by: Uuid,
    pub used: bool,
    pub used_by: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl InviteCode {
    /// Unused and unexpired at `now`. Expiry is lazy — checked at every read
    /// path that gates on validity, never swept in the background.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.used && self.expires_at > now
    }
}

/// Invite code length in characters (uppercase alphanumeric).
pub const INVITE_CODE_LEN: usize = 6;

/// Invite code time-to-live in hours.
pub const INVITE_CODE_TTL_HOURS: i64 = 24;

/// Attempts to find a collision-free code before giving up.
pub const MAX_CODE_GENERATION_ATTEMPTS: usize = 8;

/// Days a couple has been together: elapsed time since `start_date`, rounded
/// up to whole days. A couple formed earlier the same day counts as day 1.
pub fn days_together(start_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (now - start_date).num_seconds();
    if secs <= 0 {
        return 0;
    }
    (secs + 86_399) / 86_400
}
