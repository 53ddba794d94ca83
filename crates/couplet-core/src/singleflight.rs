//! In-flight fetch coalescing.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;

/// Coalesces concurrent async fetches per key.
///
/// At most one fetch runs per key at a time: later callers await the leader's
/// result instead of issuing their own. A completed result is reused for
/// `cooldown` after it lands, so a burst of calls (e.g. a tab regaining focus)
/// produces a single store round-trip.
pub struct SingleFlight<K, V> {
    cooldown: Duration,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

enum Entry<V> {
    InFlight(broadcast::Sender<Option<V>>),
    Done { value: V, at: Instant },
}

/// Releases the leader's key if its future is dropped mid-fetch (a cancelled
/// request handler, for example). Without this the `InFlight` entry would
/// outlive the only task that could ever complete it, wedging the key.
struct LeaderGuard<'a, K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    flight: &'a SingleFlight<K, V>,
    key: K,
    armed: bool,
}

impl<K, V> Drop for LeaderGuard<'_, K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut entries = self.flight.entries.lock().unwrap();
        // While our entry is in flight no other caller can replace it, so
        // whatever is stored under the key is ours.
        if let Some(Entry::InFlight(tx)) = entries.remove(&self.key) {
            let _ = tx.send(None);
        }
    }
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Run `fut` for `key`, unless an identical fetch is already in flight
    /// (await its result) or completed within the cooldown window (reuse it).
    ///
    /// Only successful results are cached. A failed leader propagates its own
    /// error; followers of a failed or cancelled leader observe a generic
    /// coalescing error and the next caller becomes leader.
    pub async fn run<Fut>(&self, key: K, fut: Fut) -> anyhow::Result<V>
    where
        Fut: Future<Output = anyhow::Result<V>>,
    {
        // Decide our role under the lock, but await only after the guard is
        // gone: an await inside the guard's scope would make the future !Send
        // even with an explicit drop, since the generator still reserves the
        // guard's slot across the suspension point.
        enum Role<V> {
            Follower(broadcast::Receiver<Option<V>>),
            Cached(V),
            Leader(broadcast::Sender<Option<V>>),
        }

        let role = {
            let mut entries = self.entries.lock().unwrap();
            match entries.get(&key) {
                Some(Entry::InFlight(tx)) => {
                    // Subscribe while holding the lock: the leader also takes
                    // the lock before sending, so the result cannot be missed.
                    Role::Follower(tx.subscribe())
                }
                Some(Entry::Done { value, at }) if at.elapsed() < self.cooldown => {
                    Role::Cached(value.clone())
                }
                _ => {
                    let (tx, _) = broadcast::channel(1);
                    entries.insert(key.clone(), Entry::InFlight(tx.clone()));
                    Role::Leader(tx)
                }
            }
        };

        let tx = match role {
            Role::Follower(mut rx) => {
                return match rx.recv().await {
                    Ok(Some(value)) => Ok(value),
                    _ => Err(anyhow::anyhow!("coalesced fetch failed")),
                };
            }
            Role::Cached(value) => return Ok(value),
            Role::Leader(tx) => tx,
        };

        let mut leader = LeaderGuard {
            flight: self,
            key,
            armed: true,
        };

        let result = fut.await;
        leader.armed = false;

        let mut entries = self.entries.lock().unwrap();
        match &result {
            Ok(value) => {
                entries.insert(
                    leader.key.clone(),
                    Entry::Done {
                        value: value.clone(),
                        at: Instant::now(),
                    },
                );
                let _ = tx.send(Some(value.clone()));
            }
            Err(_) => {
                entries.remove(&leader.key);
                let _ = tx.send(None);
            }
        }
        result
    }
}
