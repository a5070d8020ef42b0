use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::debug;

use crate::utils;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Source of the current time for [`RoastStore`].
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
struct Entry {
    payload: String,
    stored_at: DateTime<Utc>,
}

/// Short-lived key → encoded roast map bridging the callback and the
/// presentation layer.
///
/// Entries older than the TTL are never returned and are dropped by
/// [`RoastStore::sweep`]. An entry is handed out once, by
/// [`RoastStore::take`]. Each insert, lookup and removal holds the lock for a
/// single map operation.
pub struct RoastStore {
    entries: Mutex<HashMap<String, Entry>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl RoastStore {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
        }
    }

    /// Stores `payload` under a fresh random key and returns the key.
    pub async fn insert(&self, payload: String) -> String {
        let key = utils::generate_key();
        let entry = Entry {
            payload,
            stored_at: self.clock.now(),
        };
        self.entries.lock().await.insert(key.clone(), entry);
        key
    }

    /// Removes the entry under `key` and returns it unless it has expired.
    pub async fn take(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        let entry = self.entries.lock().await.remove(key)?;
        (!self.is_expired(&entry, now)).then_some(entry.payload)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Drops every expired entry and returns how many were dropped.
    pub async fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, e| !self.is_expired(e, now));
        before - entries.len()
    }

    /// Runs [`RoastStore::sweep`] every `interval` until the task is aborted.
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = self.sweep().await;
                if evicted > 0 {
                    let remaining = self.len().await;
                    debug!(evicted, remaining, "Swept expired roasts");
                }
            }
        })
    }

    fn is_expired(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        now - entry.stored_at >= self.ttl
    }
}
