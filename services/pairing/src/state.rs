use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use couplet_core::singleflight::SingleFlight;

use crate::domain::gate::GraceLedger;
use crate::domain::types::Profile;
use crate::infra::db::{DbCoupleRepository, DbInviteCodeRepository, DbProfileRepository};

/// Cooldown for coalesced per-identity profile fetches.
const PROFILE_FETCH_COOLDOWN: Duration = Duration::from_secs(1);

/// Shared application state passed to every handler via axum `State`.
/// Built once in `main` and torn down with the process — no module-level
/// session singletons.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub profile_flight: Arc<SingleFlight<Uuid, Option<Profile>>>,
    pub grace: Arc<GraceLedger>,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            profile_flight: Arc::new(SingleFlight::new(PROFILE_FETCH_COOLDOWN)),
            grace: Arc::new(GraceLedger::new()),
        }
    }

    pub fn profile_repo(&self) -> DbProfileRepository {
        DbProfileRepository {
            db: self.db.clone(),
        }
    }

    pub fn invite_code_repo(&self) -> DbInviteCodeRepository {
        DbInviteCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn couple_repo(&self) -> DbCoupleRepository {
        DbCoupleRepository {
            db: self.db.clone(),
        }
    }
}
