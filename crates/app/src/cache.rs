//! Time-bounded cache with single-flight refresh.

use std::{
    future::Future,
    hash::Hash,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use rustc_hash::FxHashMap;
use tokio::{sync::Mutex as AsyncMutex, time::Instant};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

type Slot<V> = Arc<AsyncMutex<Option<Entry<V>>>>;

/// Values cached per key for a fixed TTL.
///
/// A miss runs the caller's refresh future while holding that key's slot, so
/// concurrent misses on one key wait for a single refresh instead of each
/// running their own.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    slots: Mutex<FxHashMap<K, Slot<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(FxHashMap::default()),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value for `key`, or run `refresh` and cache its output.
    pub async fn get_or_refresh<F, Fut>(&self, key: K, refresh: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let slot = self.slot(key);
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref()
            && cached.expires_at > Instant::now()
        {
            return cached.value.clone();
        }

        let value = refresh().await;

        *entry = Some(Entry {
            value: value.clone(),
            expires_at: Instant::now() + self.ttl,
        });

        value
    }

    fn slot(&self, key: K) -> Slot<V> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_default()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn value_is_reused_until_ttl_expires() {
        let cache = TtlCache::new(Duration::from_secs(60 * 60));
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let refresh = || async move { calls.fetch_add(1, Ordering::SeqCst) + 1 };

        assert_eq!(cache.get_or_refresh("rates", refresh).await, 1);
        assert_eq!(cache.get_or_refresh("rates", refresh).await, 1);

        tokio::time::advance(Duration::from_secs(60 * 60 + 1)).await;

        assert_eq!(cache.get_or_refresh("rates", refresh).await, 2);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn keys_are_cached_independently() {
        let cache = TtlCache::new(Duration::from_secs(60));

        assert_eq!(cache.get_or_refresh("a", || async { 1 }).await, 1);
        assert_eq!(cache.get_or_refresh("b", || async { 2 }).await, 2);
        assert_eq!(cache.get_or_refresh("a", || async { 3 }).await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_misses_share_one_refresh() {
        let cache = Arc::new(TtlCache::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);

                tokio::spawn(async move {
                    cache
                        .get_or_refresh("rates", || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;

                            42
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.ok(), Some(42));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
