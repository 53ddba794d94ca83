//! Session gate: derives where a client belongs from its observed profile
//! state, and tracks the one-shot grace window for transient empty reads.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::domain::types::Profile;

/// Grace window granted once per identity for a transient empty-profile read
/// (typically a tab regaining focus before the store catches up).
pub const GRACE_PERIOD: Duration = Duration::from_millis(1500);

/// Paths reachable while authenticated and named but not yet paired.
pub const ALLOWED_WITHOUT_COUPLE: &[&str] = &[
    "/",
    "/connect",
    "/couple",
    "/profile",
    "/memories",
    "/community",
];

/// Gate state for an authenticated caller. Unauthenticated callers never
/// reach the gate — the identity extractor rejects them with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Profile row transiently missing; the client should wait briefly and
    /// re-resolve rather than flash the onboarding screen.
    Grace,
    Onboarding,
    /// Named but unpaired: the connect screen, plus the couple-independent
    /// allow-list.
    Connect,
    App,
}

impl GateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grace => "grace",
            Self::Onboarding => "onboarding",
            Self::Connect => "connect",
            Self::App => "app",
        }
    }

    /// Whether `path` is reachable in this state without a redirect.
    pub fn permits(&self, path: &str) -> bool {
        match self {
            Self::App => true,
            Self::Connect => ALLOWED_WITHOUT_COUPLE.contains(&path),
            Self::Onboarding => path == "/onboarding",
            Self::Grace => false,
        }
    }
}

/// Pure gate decision. `grace_granted` is only consulted when the profile
/// row is missing.
pub fn decide(profile: Option<&Profile>, grace_granted: bool) -> GateState {
    match profile {
        None if grace_granted => GateState::Grace,
        None => GateState::Onboarding,
        Some(p) if !p.has_nickname() => GateState::Onboarding,
        Some(p) if p.couple_id.is_none() => GateState::Connect,
        Some(_) => GateState::App,
    }
}

/// How long a spent slot is remembered. Past this the identity gets a fresh
/// window on its next empty read, and the entry stops occupying the map —
/// without a bound the ledger would grow with every identity that ever spent
/// its grace.
pub const SPENT_RETENTION: Duration = Duration::from_secs(60 * 60);

enum Slot {
    Armed { deadline: Instant },
    Spent { at: Instant },
}

impl Slot {
    fn is_stale(&self, now: Instant) -> bool {
        match self {
            Self::Armed { deadline } => now.saturating_duration_since(*deadline) > SPENT_RETENTION,
            Self::Spent { at } => now.saturating_duration_since(*at) > SPENT_RETENTION,
        }
    }
}

/// Per-identity one-shot grace bookkeeping.
///
/// The first empty-profile read arms a single deadline; empty reads inside
/// the window keep the grace, and the first one past it spends it. The
/// deadline is never extended. A successful profile load re-arms the
/// identity, as does sitting spent past the retention bound.
#[derive(Default)]
pub struct GraceLedger {
    slots: Mutex<HashMap<Uuid, Slot>>,
}

impl GraceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an empty-profile read at `now`; returns whether grace applies.
    pub fn admit(&self, user_id: Uuid, now: Instant) -> bool {
        let mut slots = self.slots.lock().unwrap();
        slots.retain(|_, slot| !slot.is_stale(now));
        match slots.get(&user_id) {
            None => {
                slots.insert(
                    user_id,
                    Slot::Armed {
                        deadline: now + GRACE_PERIOD,
                    },
                );
                true
            }
            Some(Slot::Armed { deadline }) if now < *deadline => true,
            Some(Slot::Armed { .. }) => {
                slots.insert(user_id, Slot::Spent { at: now });
                false
            }
            Some(Slot::Spent { .. }) => false,
        }
    }

    /// Report a successful profile load, re-arming the identity.
    pub fn clear(&self, user_id: Uuid) {
        self.slots.lock().unwrap().remove(&user_id);
    }
}
