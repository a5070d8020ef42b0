use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::{DateTime, TimeDelta, Utc};
use tasteroast::management::{Clock, DEFAULT_TTL, RoastStore};

/// Clock that only moves when told to.
struct FakeClock(Mutex<DateTime<Utc>>);

impl FakeClock {
    fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(Utc::now())))
    }

    fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now += TimeDelta::from_std(by).unwrap();
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

fn store(clock: Arc<FakeClock>) -> RoastStore {
    RoastStore::new(DEFAULT_TTL, clock)
}

#[tokio::test]
async fn test_insert_then_take_once() {
    let store = store(FakeClock::new());

    let key = store.insert("payload".to_string()).await;

    assert_eq!(key.len(), 32);
    assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(store.take("missing").await, None);
    assert_eq!(store.take(&key).await.as_deref(), Some("payload"));
    assert_eq!(store.take(&key).await, None);
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_entries_expire_after_ttl() {
    let clock = FakeClock::new();
    let store = store(clock.clone());
    let fresh = store.insert("fresh".to_string()).await;
    let stale = store.insert("stale".to_string()).await;

    clock.advance(DEFAULT_TTL - Duration::from_secs(1));
    assert_eq!(store.take(&fresh).await.as_deref(), Some("fresh"));

    clock.advance(Duration::from_secs(1));
    assert_eq!(store.take(&stale).await, None);
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_sweep_drops_only_expired() {
    let clock = FakeClock::new();
    let store = store(clock.clone());

    store.insert("old-1".to_string()).await;
    store.insert("old-2".to_string()).await;
    clock.advance(Duration::from_secs(3 * 60));
    let fresh = store.insert("fresh".to_string()).await;
    clock.advance(Duration::from_secs(2 * 60));

    assert_eq!(store.sweep().await, 2);
    assert_eq!(store.len().await, 1);
    assert_eq!(store.take(&fresh).await.as_deref(), Some("fresh"));

    assert_eq!(store.sweep().await, 0);
}

#[tokio::test]
async fn test_concurrent_inserts_get_distinct_keys() {
    let store = Arc::new(store(FakeClock::new()));

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.insert(format!("roast {i}")).await })
        })
        .collect();

    let mut keys = Vec::new();
    for handle in handles {
        keys.push(handle.await.unwrap());
    }
    keys.sort();
    keys.dedup();

    assert_eq!(keys.len(), 50);
    assert_eq!(store.len().await, 50);
}

#[tokio::test]
async fn test_sweeper_task_evicts() {
    let clock = FakeClock::new();
    let store = Arc::new(store(clock.clone()));
    store.insert("payload".to_string()).await;

    let sweeper = Arc::clone(&store).spawn_sweeper(Duration::from_millis(20));
    clock.advance(DEFAULT_TTL);
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(store.len().await, 0);
    sweeper.abort();
}
