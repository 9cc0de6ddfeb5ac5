//! Keyed in-memory caching for api reads
//!
//! # Caching Strategy
//! Every read is identified by a key. For a given key there is at most one
//! request in flight no matter how many consumers ask for it: the first
//! caller becomes the leader and performs the fetch, later callers wait for
//! the leader's result. Successful results are kept until they get older than
//! the configured time to live or are invalidated, expired ones are pruned
//! whenever a key gets claimed. Failures are handed to the
//! callers waiting on that request but never kept, so the next caller fetches
//! again.
//!
//! When the leader is dropped before finishing, its slot is released and one
//! of the waiting callers takes over the fetch.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::debug;

pub mod season;

pub type FetchResult<V, E> = Result<Arc<V>, Arc<E>>;

enum Slot<V, E> {
    InFlight(Vec<oneshot::Sender<FetchResult<V, E>>>),
    Ready { value: Arc<V>, fetched_at: Instant },
}

enum Claim<V, E> {
    Hit(Arc<V>),
    Wait(oneshot::Receiver<FetchResult<V, E>>),
    Lead,
}

pub struct FetchCache<K, V, E> {
    slots: Arc<Mutex<HashMap<K, Slot<V, E>>>>,
    ttl: Option<Duration>,
}

impl<K, V, E> Clone for FetchCache<K, V, E> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
            ttl: self.ttl,
        }
    }
}

impl<K, V, E> FetchCache<K, V, E>
where
    K: Eq + Hash + Clone + Display,
{
    /// Creates an empty cache, `None` keeps values until they are invalidated
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Slot<V, E>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, fetched_at: Instant) -> bool {
        self.ttl.map_or(true, |ttl| fetched_at.elapsed() < ttl)
    }

    fn claim(&self, key: &K) -> Claim<V, E> {
        let mut slots = self.lock();
        if self.ttl.is_some() {
            slots.retain(|_, slot| match slot {
                Slot::Ready { fetched_at, .. } => self.is_fresh(*fetched_at),
                Slot::InFlight(_) => true,
            });
        }

        match slots.get_mut(key) {
            Some(Slot::Ready { value, fetched_at }) if self.is_fresh(*fetched_at) => {
                return Claim::Hit(Arc::clone(value));
            }
            Some(Slot::InFlight(waiters)) => {
                let (sender, receiver) = oneshot::channel();
                waiters.push(sender);
                return Claim::Wait(receiver);
            }
            _ => {}
        }
        slots.insert(key.clone(), Slot::InFlight(Vec::new()));
        Claim::Lead
    }

    /// The fresh value stored for the key, without fetching anything
    pub fn cached(&self, key: &K) -> Option<Arc<V>> {
        match self.lock().get(key) {
            Some(Slot::Ready { value, fetched_at }) if self.is_fresh(*fetched_at) => {
                Some(Arc::clone(value))
            }
            _ => None,
        }
    }

    /// Returns the value for the key, running `fetch` only if no fresh value is
    /// stored and no other caller is already fetching it
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> FetchResult<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        loop {
            match self.claim(&key) {
                Claim::Hit(value) => {
                    debug!("cache hit for '{}'", key);
                    return Ok(value);
                }
                Claim::Wait(receiver) => match receiver.await {
                    Ok(result) => return result,
                    Err(_) => debug!("fetch for '{}' was abandoned, taking it over", key),
                },
                Claim::Lead => break,
            }
        }

        debug!("fetching '{}'", key);
        let flight = Flight {
            cache: self,
            key,
            landed: false,
        };
        let result = fetch().await.map(Arc::new).map_err(Arc::new);
        flight.land(&result);
        result
    }

    /// Drops the stored value for the key, the next read fetches again
    pub fn invalidate(&self, key: &K) {
        let mut slots = self.lock();
        if matches!(slots.get(key), Some(Slot::Ready { .. })) {
            debug!("invalidating '{}'", key);
            slots.remove(key);
        }
    }
}

/// The leader's claim on a key while its fetch runs
struct Flight<'a, K, V, E>
where
    K: Eq + Hash + Clone + Display,
{
    cache: &'a FetchCache<K, V, E>,
    key: K,
    landed: bool,
}

impl<K, V, E> Flight<'_, K, V, E>
where
    K: Eq + Hash + Clone + Display,
{
    fn land(mut self, result: &FetchResult<V, E>) {
        self.landed = true;

        let previous = {
            let mut slots = self.cache.lock();
            match result {
                Ok(value) => slots.insert(
                    self.key.clone(),
                    Slot::Ready {
                        value: Arc::clone(value),
                        fetched_at: Instant::now(),
                    },
                ),
                Err(_) => slots.remove(&self.key),
            }
        };

        if let Some(Slot::InFlight(waiters)) = previous {
            for waiter in waiters {
                // the waiter may have been dropped meanwhile
                let _ = waiter.send(result.clone());
            }
        }
    }
}

impl<K, V, E> Drop for Flight<'_, K, V, E>
where
    K: Eq + Hash + Clone + Display,
{
    fn drop(&mut self) {
        if self.landed {
            return;
        }
        let mut slots = self.cache.lock();
        if matches!(slots.get(&self.key), Some(Slot::InFlight(_))) {
            slots.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    type TestCache = FetchCache<u32, String, String>;

    async fn slow_fetch(calls: Arc<AtomicUsize>, result: Result<&str, &str>) -> Result<String, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        result.map(str::to_owned).map_err(str::to_owned)
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_reads_share_one_fetch() {
        let cache = TestCache::new(None);
        let calls = Arc::new(AtomicUsize::new(0));

        let (first, second) = tokio::join!(
            cache.get_or_fetch(1, || slow_fetch(Arc::clone(&calls), Ok("season one"))),
            cache.get_or_fetch(1, || slow_fetch(Arc::clone(&calls), Ok("other"))),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.unwrap().as_str(), "season one");
        assert_eq!(second.unwrap().as_str(), "season one");
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_keys_fetch_separately() {
        let cache = TestCache::new(None);
        let calls = Arc::new(AtomicUsize::new(0));

        let (first, second) = tokio::join!(
            cache.get_or_fetch(1, || slow_fetch(Arc::clone(&calls), Ok("one"))),
            cache.get_or_fetch(2, || slow_fetch(Arc::clone(&calls), Ok("two"))),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(first.unwrap().as_str(), "one");
        assert_eq!(second.unwrap().as_str(), "two");
    }

    #[tokio::test(start_paused = true)]
    async fn stored_value_is_reused() {
        let cache = TestCache::new(None);
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch(1, || slow_fetch(Arc::clone(&calls), Ok("one")))
            .await
            .unwrap();
        let again = cache
            .get_or_fetch(1, || slow_fetch(Arc::clone(&calls), Ok("changed")))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(again.as_str(), "one");
        assert_eq!(cache.cached(&1).as_deref().map(String::as_str), Some("one"));
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_shared_but_not_stored() {
        let cache = TestCache::new(None);
        let calls = Arc::new(AtomicUsize::new(0));

        let (first, second) = tokio::join!(
            cache.get_or_fetch(1, || slow_fetch(Arc::clone(&calls), Err("offline"))),
            cache.get_or_fetch(1, || slow_fetch(Arc::clone(&calls), Ok("unused"))),
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.unwrap_err().as_str(), "offline");
        assert_eq!(second.unwrap_err().as_str(), "offline");
        assert!(cache.cached(&1).is_none());

        let retried = cache
            .get_or_fetch(1, || slow_fetch(Arc::clone(&calls), Ok("back online")))
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(retried.unwrap().as_str(), "back online");
    }

    #[tokio::test(start_paused = true)]
    async fn invalidation_forces_a_fetch() {
        let cache = TestCache::new(None);
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch(1, || slow_fetch(Arc::clone(&calls), Ok("old")))
            .await
            .unwrap();
        cache.invalidate(&1);
        let fresh = cache
            .get_or_fetch(1, || slow_fetch(Arc::clone(&calls), Ok("new")))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(fresh.as_str(), "new");
    }

    #[tokio::test(start_paused = true)]
    async fn expired_values_of_other_keys_are_pruned() {
        let cache = TestCache::new(Some(Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        for key in [1, 2] {
            cache
                .get_or_fetch(key, || slow_fetch(Arc::clone(&calls), Ok("value")))
                .await
                .unwrap();
        }
        assert_eq!(cache.lock().len(), 2);

        tokio::time::advance(Duration::from_secs(61)).await;
        cache
            .get_or_fetch(3, || slow_fetch(Arc::clone(&calls), Ok("value")))
            .await
            .unwrap();

        let slots = cache.lock();
        assert_eq!(slots.len(), 1);
        assert!(slots.contains_key(&3));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_values_are_fetched_again() {
        let cache = TestCache::new(Some(Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch(1, || slow_fetch(Arc::clone(&calls), Ok("old")))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(cache.cached(&1).is_some());

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(cache.cached(&1).is_none());

        let fresh = cache
            .get_or_fetch(1, || slow_fetch(Arc::clone(&calls), Ok("new")))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(fresh.as_str(), "new");
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_leader_hands_over_to_a_waiter() {
        let cache = TestCache::new(None);
        let calls = Arc::new(AtomicUsize::new(0));

        let mut leader =
            Box::pin(cache.get_or_fetch(1, || slow_fetch(Arc::clone(&calls), Ok("leader"))));
        let mut waiter =
            Box::pin(cache.get_or_fetch(1, || slow_fetch(Arc::clone(&calls), Ok("waiter"))));

        // both get polled once, the leader claims the key and the waiter joins it
        assert!(tokio::time::timeout(Duration::from_millis(10), leader.as_mut())
            .await
            .is_err());
        assert!(tokio::time::timeout(Duration::from_millis(10), waiter.as_mut())
            .await
            .is_err());
        drop(leader);

        let result = waiter.await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(result.as_str(), "waiter");
    }
}
