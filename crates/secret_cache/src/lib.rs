//! # Secret Cache
//!
//! Time-bounded cache in front of a secret store.
//!
//! The cache is an owned value: callers create it, keep it for as long as
//! values may be reused (e.g. across invocations of a warm runtime) and
//! inject both the source and the clock.

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use std::collections::HashMap;
use std::time::{Duration, Instant};

use contracts::ContractError;
use tracing::{debug, error, instrument};

/// Default time-to-live for cached secrets
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Backing secret store
#[trait_variant::make(SecretSource: Send)]
pub trait LocalSecretSource {
    /// Fetch the current value of `name`
    ///
    /// # Errors
    /// Returns `SecretFetch` when the store cannot provide the value
    async fn fetch(&self, name: &str) -> Result<String, ContractError>;
}

#[derive(Debug, Clone)]
struct CachedSecret {
    value: String,
    fetched_at: Instant,
}

/// TTL cache keyed by secret name
pub struct SecretCache<S, C = SystemClock> {
    source: S,
    clock: C,
    ttl: Duration,
    entries: HashMap<String, CachedSecret>,
}

impl<S: SecretSource> SecretCache<S, SystemClock> {
    /// Cache with the wall clock and `DEFAULT_TTL`
    pub fn new(source: S) -> Self {
        Self::with_clock(source, SystemClock, DEFAULT_TTL)
    }
}

impl<S: SecretSource, C: Clock> SecretCache<S, C> {
    pub fn with_clock(source: S, clock: C, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a secret, fetching it when absent or older than the TTL
    ///
    /// A failed fetch leaves any existing entry untouched and is returned
    /// to the caller; an expired value is never served.
    #[instrument(name = "secret_cache_get", skip(self))]
    pub async fn get(&mut self, name: &str) -> Result<String, ContractError> {
        let now = self.clock.now();

        if let Some(entry) = self.entries.get(name) {
            if now.saturating_duration_since(entry.fetched_at) < self.ttl {
                debug!("Returning cached secret");
                observability::record_secret_lookup(true);
                return Ok(entry.value.clone());
            }
        }

        observability::record_secret_lookup(false);
        debug!("Fetching secret");

        let value = self.source.fetch(name).await.inspect_err(|e| {
            error!(error = %e, "Error retrieving secret");
        })?;

        self.entries.insert(
            name.to_string(),
            CachedSecret {
                value: value.clone(),
                fetched_at: now,
            },
        );
        Ok(value)
    }

    /// Drop a cached entry so the next `get` fetches
    pub fn invalidate(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Number of cached entries (fresh or stale)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Mock source for testing
    #[derive(Clone, Default)]
    struct MockSource {
        fetches: Arc<AtomicUsize>,
        failing: Arc<AtomicBool>,
    }

    impl SecretSource for MockSource {
        async fn fetch(&self, name: &str) -> Result<String, ContractError> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            if self.failing.load(Ordering::SeqCst) {
                return Err(ContractError::secret_fetch(name, "store unavailable"));
            }
            Ok(format!("{name}-v{n}"))
        }
    }

    fn cache(source: &MockSource, clock: &ManualClock) -> SecretCache<MockSource, ManualClock> {
        SecretCache::with_clock(source.clone(), clock.clone(), DEFAULT_TTL)
    }

    #[tokio::test]
    async fn test_cached_within_ttl() {
        let source = MockSource::default();
        let clock = ManualClock::new();
        let mut cache = cache(&source, &clock);

        assert_eq!(cache.get("db").await.unwrap(), "db-v1");
        clock.advance(Duration::from_secs(299));
        assert_eq!(cache.get("db").await.unwrap(), "db-v1");
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refetched_after_ttl() {
        let source = MockSource::default();
        let clock = ManualClock::new();
        let mut cache = cache(&source, &clock);

        cache.get("db").await.unwrap();
        clock.advance(DEFAULT_TTL);
        assert_eq!(cache.get("db").await.unwrap(), "db-v2");
    }

    #[tokio::test]
    async fn test_entries_are_per_name() {
        let source = MockSource::default();
        let clock = ManualClock::new();
        let mut cache = cache(&source, &clock);

        assert_eq!(cache.get("a").await.unwrap(), "a-v1");
        assert_eq!(cache.get("b").await.unwrap(), "b-v2");
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_does_not_serve_stale_value() {
        let source = MockSource::default();
        let clock = ManualClock::new();
        let mut cache = cache(&source, &clock);

        cache.get("db").await.unwrap();
        clock.advance(DEFAULT_TTL + Duration::from_secs(1));
        source.failing.store(true, Ordering::SeqCst);

        let err = cache.get("db").await.unwrap_err();
        assert!(matches!(err, ContractError::SecretFetch { .. }));

        // Store recovers: a fresh value is fetched
        source.failing.store(false, Ordering::SeqCst);
        assert_eq!(cache.get("db").await.unwrap(), "db-v3");
    }

    #[tokio::test]
    async fn test_invalidate_forces_fetch() {
        let source = MockSource::default();
        let clock = ManualClock::new();
        let mut cache = cache(&source, &clock);

        cache.get("db").await.unwrap();
        assert!(cache.invalidate("db"));
        assert!(!cache.invalidate("db"));
        assert!(cache.is_empty());
        assert_eq!(cache.get("db").await.unwrap(), "db-v2");
    }

    #[tokio::test]
    async fn test_system_clock_default_ttl() {
        let cache = SecretCache::new(MockSource::default());
        assert_eq!(cache.ttl(), Duration::from_secs(300));
    }
}
