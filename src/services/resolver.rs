//! The resolution chain: cache → store → upstream, with cache-aside
//! population and detached write-back to the store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::domain::error::ResolveError;
use crate::domain::models::LookupKey;
use crate::domain::ports::{EntityStore, ProviderError, StoreError, UpstreamProvider};
use crate::services::cache::EntityCache;

/// Called when a detached persistence task fails. The default logs a
/// warning; tests inject their own to observe the failure.
pub type PersistFailureHook = Arc<dyn Fn(&LookupKey, &StoreError) + Send + Sync>;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_PERSIST_TIMEOUT: Duration = Duration::from_secs(5);

/// Orchestrates one lookup across the three tiers.
///
/// Tiers are consulted strictly in order and the first usable entity
/// wins; no tier is consulted twice and partial results are never
/// merged. Store-tier failures (not ready, timed out, query error)
/// degrade to a miss. Upstream failures are terminal for the request
/// and are never retried.
///
/// Concurrent resolutions for the same key are not coalesced: two
/// simultaneous misses may both reach the provider and both populate
/// the cache (last write wins) and the store (conflict handling
/// delegated to the store).
pub struct Resolver<E: Clone + Send + Sync + 'static> {
    cache: EntityCache<E>,
    store: Arc<dyn EntityStore<E>>,
    upstream: Arc<dyn UpstreamProvider<E>>,
    request_timeout: Duration,
    upstream_timeout: Duration,
    persist_timeout: Duration,
    persist_failure_hook: PersistFailureHook,
    inflight_persists: Arc<AtomicUsize>,
}

impl<E: Clone + Send + Sync + 'static> Resolver<E> {
    /// Create a resolver with default (5s) tier budgets.
    ///
    /// The cache is injected rather than owned globally so callers
    /// control its lifetime and tests get isolation.
    pub fn new(
        cache: EntityCache<E>,
        store: Arc<dyn EntityStore<E>>,
        upstream: Arc<dyn UpstreamProvider<E>>,
    ) -> Self {
        Self {
            cache,
            store,
            upstream,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            persist_timeout: DEFAULT_PERSIST_TIMEOUT,
            persist_failure_hook: Arc::new(|key, err| {
                warn!(%key, error = %err, "failed to persist resolved entity");
            }),
            inflight_persists: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the whole-request budget covering the store probe and,
    /// as an upper bound, the upstream fetch.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Cap the upstream fetch independently of the request budget.
    /// The effective upstream deadline is the earlier of the two.
    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    /// Set the budget for the detached store write-back.
    pub fn with_persist_timeout(mut self, timeout: Duration) -> Self {
        self.persist_timeout = timeout;
        self
    }

    /// Replace the persist-failure callback (default: tracing warning).
    pub fn with_persist_failure_hook(mut self, hook: PersistFailureHook) -> Self {
        self.persist_failure_hook = hook;
        self
    }

    /// Resolve one raw key to an entity, or fail the whole request.
    ///
    /// The raw input is normalized once and the canonical key is used
    /// against every tier. On an upstream hit the entity is cached
    /// synchronously and persisted asynchronously; the caller never
    /// observes the persistence outcome.
    pub async fn resolve(&self, raw_key: &str) -> Result<E, ResolveError> {
        let key = LookupKey::normalize(raw_key);
        let deadline = Instant::now() + self.request_timeout;

        if let Some(entity) = self.cache.get(&key).await {
            debug!(%key, "resolved from cache");
            return Ok(entity);
        }

        if let Some(entity) = self.probe_store(&key, deadline).await {
            debug!(%key, "resolved from store");
            return Ok(entity);
        }

        info!(%key, "cache and store missed, querying upstream provider");
        let entity = self.fetch_upstream(&key, deadline).await?;

        // Cache and persist under the request's canonical key. The
        // provider may decorate the entity's own title/name beyond
        // casing; keying by that would leave the record unreachable
        // for every later lookup of the same raw input.
        self.cache.insert(key.clone(), entity.clone()).await;
        self.spawn_persist(key, entity.clone());

        Ok(entity)
    }

    /// Store probe under the request deadline. Every failure mode
    /// (gate never fired, probe timed out, query error) degrades to a
    /// miss so the chain can continue to the upstream tier.
    async fn probe_store(&self, key: &LookupKey, deadline: Instant) -> Option<E> {
        match timeout_at(deadline, self.store.get(key)).await {
            Ok(Ok(found)) => found,
            Ok(Err(err)) => {
                debug!(%key, error = %err, "store probe failed, treating as miss");
                None
            }
            Err(_) => {
                debug!(%key, "store probe timed out, treating as miss");
                None
            }
        }
    }

    /// Single outbound fetch, bounded by the earlier of the remaining
    /// request budget and the upstream cap. Not retried.
    async fn fetch_upstream(&self, key: &LookupKey, deadline: Instant) -> Result<E, ResolveError> {
        let upstream_deadline = deadline.min(Instant::now() + self.upstream_timeout);

        match timeout_at(upstream_deadline, self.upstream.fetch(key)).await {
            Ok(Ok(entity)) => Ok(entity),
            Ok(Err(ProviderError::NoResult)) => Err(ResolveError::NotFound(key.clone())),
            Ok(Err(ProviderError::Transport(err))) => Err(ResolveError::Upstream(err)),
            Err(_) => Err(ResolveError::Upstream(anyhow::anyhow!(
                "upstream request timed out"
            ))),
        }
    }

    /// Detached write-back to the store under a fresh deadline,
    /// decoupled from the originating request's lifetime. Failure is
    /// reported through the hook and nowhere else; the cache entry
    /// inserted before this call stands regardless.
    fn spawn_persist(&self, key: LookupKey, entity: E) {
        let store = Arc::clone(&self.store);
        let hook = Arc::clone(&self.persist_failure_hook);
        let budget = self.persist_timeout;
        let inflight = Arc::clone(&self.inflight_persists);
        inflight.fetch_add(1, Ordering::SeqCst);

        tokio::spawn(async move {
            match tokio::time::timeout(budget, store.insert(&key, &entity)).await {
                Ok(Ok(())) => debug!(%key, "persisted upstream result"),
                Ok(Err(err)) => hook(&key, &err),
                Err(_) => hook(&key, &StoreError::Unavailable),
            }
            inflight.fetch_sub(1, Ordering::SeqCst);
        });
    }

    /// Wait up to `budget` for in-flight write-backs to settle.
    ///
    /// Short-lived hosts call this before exiting so a just-resolved
    /// entity gets its chance to reach the store; a long-lived host
    /// never needs to. Returns false if the budget elapsed with work
    /// still pending.
    pub async fn drain_persists(&self, budget: Duration) -> bool {
        let deadline = Instant::now() + budget;
        while self.inflight_persists.load(Ordering::SeqCst) > 0 {
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::models::Movie;

    fn movie(title: &str) -> Movie {
        Movie {
            imdb_id: "tt1375666".to_string(),
            title: title.to_string(),
            year: "2010".to_string(),
            ..Movie::default()
        }
    }

    struct FakeStore {
        record: Option<Movie>,
        ready: bool,
        fail_inserts: bool,
        get_calls: AtomicUsize,
        insert_calls: AtomicUsize,
        inserted_keys: std::sync::Mutex<Vec<LookupKey>>,
    }

    impl FakeStore {
        fn empty() -> Self {
            Self {
                record: None,
                ready: true,
                fail_inserts: false,
                get_calls: AtomicUsize::new(0),
                insert_calls: AtomicUsize::new(0),
                inserted_keys: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn with_record(record: Movie) -> Self {
            Self {
                record: Some(record),
                ..Self::empty()
            }
        }

        fn never_ready() -> Self {
            Self {
                ready: false,
                ..Self::empty()
            }
        }

        fn failing_inserts() -> Self {
            Self {
                fail_inserts: true,
                ..Self::empty()
            }
        }
    }

    #[async_trait]
    impl EntityStore<Movie> for FakeStore {
        async fn get(&self, _key: &LookupKey) -> Result<Option<Movie>, StoreError> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            if !self.ready {
                // Gate that never fires: the caller's deadline is the
                // only way out.
                std::future::pending::<()>().await;
            }
            Ok(self.record.clone())
        }

        async fn insert(&self, key: &LookupKey, _entity: &Movie) -> Result<(), StoreError> {
            self.insert_calls.fetch_add(1, Ordering::SeqCst);
            self.inserted_keys.lock().unwrap().push(key.clone());
            if self.fail_inserts {
                return Err(StoreError::Query(anyhow::anyhow!("disk full")));
            }
            Ok(())
        }
    }

    enum Script {
        Hit(Movie),
        NoResult,
        Transport,
    }

    struct FakeProvider {
        script: Script,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(script: Script) -> Self {
            Self {
                script,
                delay: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl UpstreamProvider<Movie> for FakeProvider {
        async fn fetch(&self, _key: &LookupKey) -> Result<Movie, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.script {
                Script::Hit(entity) => Ok(entity.clone()),
                Script::NoResult => Err(ProviderError::NoResult),
                Script::Transport => {
                    Err(ProviderError::Transport(anyhow::anyhow!("connection reset")))
                }
            }
        }
    }

    async fn wait_until(what: impl Fn() -> bool) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while !what() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test]
    async fn cache_hit_skips_store_and_upstream() {
        let cache = EntityCache::new();
        cache
            .insert(LookupKey::normalize("inception"), movie("INCEPTION"))
            .await;

        let store = Arc::new(FakeStore::with_record(movie("STALE")));
        let provider = Arc::new(FakeProvider::new(Script::NoResult));
        let resolver = Resolver::new(cache, store.clone(), provider.clone());

        let resolved = resolver.resolve("Inception").await.unwrap();

        assert_eq!(resolved.title, "INCEPTION");
        assert_eq!(store.get_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn store_hit_skips_upstream() {
        let store = Arc::new(FakeStore::with_record(movie("INCEPTION")));
        let provider = Arc::new(FakeProvider::new(Script::Transport));
        let resolver = Resolver::new(EntityCache::new(), store.clone(), provider.clone());

        let resolved = resolver.resolve("inception").await.unwrap();

        assert_eq!(resolved.title, "INCEPTION");
        assert_eq!(store.get_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn full_miss_falls_back_to_upstream_and_populates_cache() {
        let store = Arc::new(FakeStore::empty());
        let provider = Arc::new(FakeProvider::new(Script::Hit(movie("INCEPTION"))));
        let resolver = Resolver::new(EntityCache::new(), store.clone(), provider.clone());

        let first = resolver.resolve("inception").await.unwrap();
        assert_eq!(first.title, "INCEPTION");

        // The write-back is detached; drain it before asserting.
        assert!(resolver.drain_persists(Duration::from_secs(2)).await);
        assert_eq!(store.insert_calls.load(Ordering::SeqCst), 1);

        let second = resolver.resolve("INCEPTION").await.unwrap();
        assert_eq!(second, first);
        assert_eq!(store.get_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn explicit_no_result_yields_not_found_and_leaves_cache_empty() {
        let cache = EntityCache::new();
        let store = Arc::new(FakeStore::empty());
        let provider = Arc::new(FakeProvider::new(Script::NoResult));
        let resolver = Resolver::new(cache.clone(), store, provider);

        let err = resolver.resolve("no such movie").await.unwrap_err();

        assert!(matches!(err, ResolveError::NotFound(_)));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn transport_failure_surfaces_and_leaves_cache_empty() {
        let cache = EntityCache::new();
        let store = Arc::new(FakeStore::empty());
        let provider = Arc::new(FakeProvider::new(Script::Transport));
        let resolver = Resolver::new(cache.clone(), store, provider);

        let err = resolver.resolve("inception").await.unwrap_err();

        assert!(matches!(err, ResolveError::Upstream(_)));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn store_never_ready_falls_through_within_the_deadline() {
        let store = Arc::new(FakeStore::never_ready());
        let provider = Arc::new(FakeProvider::new(Script::Hit(movie("INCEPTION"))));
        let resolver = Resolver::new(EntityCache::new(), store.clone(), provider)
            .with_request_timeout(Duration::from_millis(200));

        let started = std::time::Instant::now();
        let resolved = resolver.resolve("inception").await.unwrap();

        assert_eq!(resolved.title, "INCEPTION");
        assert_eq!(store.get_calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn slow_upstream_times_out_as_transport_failure() {
        let store = Arc::new(FakeStore::empty());
        let provider = Arc::new(
            FakeProvider::new(Script::Hit(movie("INCEPTION")))
                .with_delay(Duration::from_millis(500)),
        );
        let resolver = Resolver::new(EntityCache::new(), store, provider)
            .with_upstream_timeout(Duration::from_millis(50));

        let err = resolver.resolve("inception").await.unwrap_err();
        assert!(matches!(err, ResolveError::Upstream(_)));
    }

    #[tokio::test]
    async fn persist_failure_is_invisible_to_the_caller() {
        let cache = EntityCache::new();
        let store = Arc::new(FakeStore::failing_inserts());
        let provider = Arc::new(FakeProvider::new(Script::Hit(movie("INCEPTION"))));

        let hook_fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&hook_fired);
        let resolver = Resolver::new(cache.clone(), store.clone(), provider)
            .with_persist_failure_hook(Arc::new(move |_key, _err| {
                flag.store(true, Ordering::SeqCst);
            }));

        let resolved = resolver.resolve("inception").await.unwrap();
        assert_eq!(resolved.title, "INCEPTION");

        wait_until(|| hook_fired.load(Ordering::SeqCst)).await;

        // The cache entry stands regardless of the failed write-back.
        assert_eq!(
            cache.get(&LookupKey::normalize("inception")).await,
            Some(resolved)
        );
        assert_eq!(store.insert_calls.load(Ordering::SeqCst), 1);
    }

    // The provider's returned title can differ from the queried key
    // beyond casing. Population must still use the request's canonical
    // key, or the cached and stored record is unreachable and every
    // later lookup re-fetches upstream.
    #[tokio::test]
    async fn population_uses_the_request_key_when_the_title_differs() {
        let store = Arc::new(FakeStore::empty());
        let provider = Arc::new(FakeProvider::new(Script::Hit(movie(
            "THE GODFATHER: PART II",
        ))));
        let resolver = Resolver::new(EntityCache::new(), store.clone(), provider.clone());

        let first = resolver.resolve("the godfather part ii").await.unwrap();
        assert_eq!(first.title, "THE GODFATHER: PART II");

        assert!(resolver.drain_persists(Duration::from_secs(2)).await);
        assert_eq!(
            store.inserted_keys.lock().unwrap().as_slice(),
            &[LookupKey::normalize("the godfather part ii")]
        );

        // Same raw input again: served from cache, no second fetch.
        let second = resolver.resolve("THE GODFATHER PART II").await.unwrap();
        assert_eq!(second, first);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get_calls.load(Ordering::SeqCst), 1);
    }

    // Documents the existing duplicate-fetch behavior: concurrent
    // misses for the same key are not coalesced, so both reach the
    // provider. Last write wins in the cache. This pins down what the
    // chain does today, not a guarantee worth preserving.
    #[tokio::test]
    async fn concurrent_same_key_misses_both_reach_upstream() {
        let store = Arc::new(FakeStore::empty());
        let provider = Arc::new(
            FakeProvider::new(Script::Hit(movie("INCEPTION")))
                .with_delay(Duration::from_millis(100)),
        );
        let resolver = Arc::new(Resolver::new(
            EntityCache::new(),
            store,
            provider.clone(),
        ));

        let a = tokio::spawn({
            let resolver = Arc::clone(&resolver);
            async move { resolver.resolve("inception").await }
        });
        let b = tokio::spawn({
            let resolver = Arc::clone(&resolver);
            async move { resolver.resolve("inception").await }
        });

        assert!(a.await.unwrap().is_ok());
        assert!(b.await.unwrap().is_ok());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }
}
