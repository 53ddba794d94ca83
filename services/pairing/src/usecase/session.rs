use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use couplet_core::singleflight::SingleFlight;

use crate::domain::gate::{self, GateState, GraceLedger};
use crate::domain::repository::ProfileRepository;
use crate::domain::types::Profile;
use crate::error::PairingServiceError;

#[derive(Debug)]
pub struct GateDecision {
    pub state: GateState,
    pub profile: Option<Profile>,
}

/// Resolves the caller's gate state from the store.
///
/// Profile reads are coalesced through the shared single-flight so a burst of
/// gate resolutions (tab refocus, several mounted views) costs one store
/// round-trip, and a transient empty read is absorbed by the one-shot grace
/// window instead of bouncing a set-up user to onboarding.
pub struct ResolveGateUseCase<R: ProfileRepository> {
    pub profiles: R,
    pub flight: Arc<SingleFlight<Uuid, Option<Profile>>>,
    pub grace: Arc<GraceLedger>,
}

impl<R: ProfileRepository> ResolveGateUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<GateDecision, PairingServiceError> {
        let profiles = &self.profiles;
        let profile = self
            .flight
            .run(user_id, async move {
                profiles
                    .find_by_id(user_id)
                    .await
                    .map_err(anyhow::Error::new)
            })
            .await?;

        let state = match profile {
            None => gate::decide(None, self.grace.admit(user_id, Instant::now())),
            Some(ref p) => {
                self.grace.clear(user_id);
                gate::decide(Some(p), false)
            }
        };

        Ok(GateDecision { state, profile })
    }
}
