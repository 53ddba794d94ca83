use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use tower_http::trace::TraceLayer;

use couplet_core::health::{healthz, readyz};
use couplet_core::middleware::request_id_layer;

use crate::handlers::{
    couple::{breakup, get_couple},
    invite_code::{create_invite_code, get_active_invite_code, regenerate_invite_code},
    pairing::connect_with_code,
    profile::{ensure_profile, get_me, update_me},
    session::resolve_gate,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Profiles
        .route("/users", post(ensure_profile))
        .route("/users/@me", get(get_me))
        .route("/users/@me", patch(update_me))
        // Session gate
        .route("/session/gate", get(resolve_gate))
        // Invite codes
        .route("/invite-codes", post(create_invite_code))
        .route("/invite-codes/active", get(get_active_invite_code))
        .route("/invite-codes/regenerate", post(regenerate_invite_code))
        // Pairing
        .route("/pairing", post(connect_with_code))
        // Couple
        .route("/couple", get(get_couple))
        .route("/couple", delete(breakup))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
