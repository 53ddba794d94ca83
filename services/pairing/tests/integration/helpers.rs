use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use couplet_pairing::domain::repository::{
    CoupleRepository, InviteCodeRepository, ProfileRepository,
};
use couplet_pairing::domain::types::{Couple, InviteCode, Profile};
use couplet_pairing::error::PairingServiceError;

// ── In-memory store ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct Store {
    pub profiles: Vec<Profile>,
    pub codes: Vec<InviteCode>,
    pub couples: Vec<Couple>,
}

/// Mock backing store shared by all three repository traits. Every mutation
/// happens under one lock, mirroring the atomicity contract of the real
/// transactions (in particular the redeem compare-and-swap).
#[derive(Clone, Default)]
pub struct MockWorld {
    pub store: Arc<Mutex<Store>>,
}

impl MockWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_profile(&self, profile: Profile) {
        self.store.lock().unwrap().profiles.push(profile);
    }

    pub fn remove_profile(&self, id: Uuid) {
        self.store.lock().unwrap().profiles.retain(|p| p.id != id);
    }

    pub fn add_code(&self, code: InviteCode) {
        self.store.lock().unwrap().codes.push(code);
    }

    pub fn profile(&self, id: Uuid) -> Option<Profile> {
        self.store
            .lock()
            .unwrap()
            .profiles
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn code(&self, code: &str) -> Option<InviteCode> {
        self.store
            .lock()
            .unwrap()
            .codes
            .iter()
            .find(|c| c.code == code)
            .cloned()
    }

    pub fn active_codes(&self, creator_id: Uuid) -> Vec<InviteCode> {
        let now = Utc::now();
        self.store
            .lock()
            .unwrap()
            .codes
            .iter()
            .filter(|c| c.created_by == creator_id && c.is_active(now))
            .cloned()
            .collect()
    }

    pub fn couples_len(&self) -> usize {
        self.store.lock().unwrap().couples.len()
    }
}

impl ProfileRepository for MockWorld {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, PairingServiceError> {
        Ok(self.profile(id))
    }

    async fn upsert_identity(&self, id: Uuid, email: &str) -> Result<(), PairingServiceError> {
        let mut store = self.store.lock().unwrap();
        let now = Utc::now();
        if let Some(existing) = store.profiles.iter_mut().find(|p| p.id == id) {
            existing.email = email.to_owned();
            existing.updated_at = now;
        } else {
            store.profiles.push(Profile {
                id,
                email: email.to_owned(),
                nickname: None,
                avatar_url: None,
                couple_id: None,
                created_at: now,
                updated_at: now,
            });
        }
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        nickname: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<(), PairingServiceError> {
        let mut store = self.store.lock().unwrap();
        let profile = store
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PairingServiceError::UserNotFound)?;
        if let Some(nickname) = nickname {
            profile.nickname = Some(nickname.to_owned());
        }
        if let Some(avatar_url) = avatar_url {
            profile.avatar_url = Some(avatar_url.to_owned());
        }
        profile.updated_at = Utc::now();
        Ok(())
    }
}

impl InviteCodeRepository for MockWorld {
    async fn create(&self, code: &InviteCode) -> Result<bool, PairingServiceError> {
        let mut store = self.store.lock().unwrap();
        if store.codes.iter().any(|c| c.code == code.code) {
            return Ok(false);
        }
        store.codes.push(code.clone());
        Ok(true)
    }

    async fn find_active_by_creator(
        &self,
        creator_id: Uuid,
    ) -> Result<Option<InviteCode>, PairingServiceError> {
        let now = Utc::now();
        Ok(self
            .store
            .lock()
            .unwrap()
            .codes
            .iter()
            .filter(|c| c.created_by == creator_id && c.is_active(now))
            .max_by_key(|c| c.created_at)
            .cloned())
    }

    async fn find_unused_by_code(
        &self,
        code: &str,
    ) -> Result<Option<InviteCode>, PairingServiceError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .codes
            .iter()
            .find(|c| c.code == code && !c.used)
            .cloned())
    }

    async fn invalidate_all(&self, creator_id: Uuid) -> Result<u64, PairingServiceError> {
        let mut store = self.store.lock().unwrap();
        let mut count = 0;
        for code in store.codes.iter_mut() {
            if code.created_by == creator_id && !code.used {
                code.used = true;
                count += 1;
            }
        }
        Ok(count)
    }
}

impl CoupleRepository for MockWorld {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Couple>, PairingServiceError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .couples
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn redeem(
        &self,
        code_id: Uuid,
        creator_id: Uuid,
        joiner_id: Uuid,
    ) -> Result<Couple, PairingServiceError> {
        let mut store = self.store.lock().unwrap();
        let now = Utc::now();

        // All conditions are checked before anything mutates, mirroring the
        // all-or-nothing transaction: a rejection leaves the code and both
        // profiles untouched.
        if !store
            .codes
            .iter()
            .any(|c| c.id == code_id && c.is_active(now))
        {
            return Err(PairingServiceError::InvalidCode);
        }
        let creator_paired = store
            .profiles
            .iter()
            .any(|p| p.id == creator_id && p.couple_id.is_some());
        if creator_paired {
            return Err(PairingServiceError::CreatorAlreadyPaired);
        }
        let joiner_paired = store
            .profiles
            .iter()
            .any(|p| p.id == joiner_id && p.couple_id.is_some());
        if joiner_paired {
            return Err(PairingServiceError::AlreadyPaired);
        }

        if let Some(code) = store.codes.iter_mut().find(|c| c.id == code_id) {
            code.used = true;
            code.used_by = Some(joiner_id);
        }
        let couple = Couple {
            id: Uuid::now_v7(),
            user1_id: creator_id,
            user2_id: joiner_id,
            couple_name: None,
            start_date: now,
            created_at: now,
            updated_at: now,
        };
        for profile in store.profiles.iter_mut() {
            if profile.id == creator_id || profile.id == joiner_id {
                profile.couple_id = Some(couple.id);
            }
        }
        store.couples.push(couple.clone());
        Ok(couple)
    }

    async fn dissolve(&self, couple_id: Uuid) -> Result<bool, PairingServiceError> {
        let mut store = self.store.lock().unwrap();
        for profile in store.profiles.iter_mut() {
            if profile.couple_id == Some(couple_id) {
                profile.couple_id = None;
            }
        }
        let before = store.couples.len();
        store.couples.retain(|c| c.id != couple_id);
        Ok(store.couples.len() < before)
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_profile(nickname: Option<&str>) -> Profile {
    let now = Utc::now();
    let id = Uuid::now_v7();
    Profile {
        id,
        email: format!("{id}@example.com"),
        nickname: nickname.map(str::to_owned),
        avatar_url: None,
        couple_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_code(creator_id: Uuid, code: &str, ttl_hours: i64) -> InviteCode {
    let now = Utc::now();
    InviteCode {
        id: Uuid::now_v7(),
        code: code.to_owned(),
        created_by: creator_id,
        used: false,
        used_by: None,
        expires_at: now + Duration::hours(ttl_hours),
        created_at: now,
    }
}
