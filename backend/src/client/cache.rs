//! In-memory query cache shared by every typed client.
//!
//! Entries are successful query payloads keyed by [`CacheKey`]. The cache
//! has no authority: dropping an entry only costs one more dispatch.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use mockable::Clock;
use serde_json::Value;
use tracing::debug;

use super::cache_key::CacheKey;
use super::invalidation::Entity;

struct Entry {
    value: Value,
    stored_at: DateTime<Utc>,
}

/// Snapshot of an entity's invalidation count, taken before a fetch starts.
///
/// A fetch that races with a mutation of the same entity must not store its
/// now-outdated result; [`QueryCache::store`] compares generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Concurrent map from cache key to the last successful query payload.
pub struct QueryCache {
    entries: DashMap<CacheKey, Entry>,
    generations: DashMap<Entity, u64>,
    clock: Arc<dyn Clock>,
    stale_after: Option<TimeDelta>,
}

impl QueryCache {
    /// Cache whose entries never expire on their own.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            generations: DashMap::new(),
            clock,
            stale_after: None,
        }
    }

    /// Expire entries `stale_after` their insertion, as measured by the
    /// clock. Durations beyond the clock's range never expire.
    #[must_use]
    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = TimeDelta::from_std(stale_after).ok();
        self
    }

    /// The fresh payload stored under `key`, if any. Stale entries are
    /// removed on access.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let now = self.clock.utc();
        let stale_after = self.stale_after;
        let expired = |entry: &Entry| stale_after.is_some_and(|ttl| now - entry.stored_at >= ttl);

        if let Some(entry) = self.entries.get(key) {
            if !expired(&entry) {
                return Some(entry.value.clone());
            }
        }
        if self
            .entries
            .remove_if(key, |_, entry| expired(entry))
            .is_some()
        {
            debug!(%key, "cache entry expired");
        }
        None
    }

    /// The current generation of `entity`.
    pub fn generation(&self, entity: Entity) -> Generation {
        Generation(self.generations.get(&entity).map_or(0, |value| *value))
    }

    /// Store `value` under `key` unless `key`'s entity was invalidated since
    /// `seen` was taken. Returns whether the value was stored.
    ///
    /// The generation check and the insert happen under the entity's
    /// generation lock, which [`QueryCache::invalidate`] also holds while it
    /// bumps the generation and drops entries.
    pub fn store(&self, key: CacheKey, value: Value, seen: Generation) -> bool {
        let stored_at = self.clock.utc();
        let generation = self.generations.entry(key.entity()).or_insert(0);
        if Generation(*generation) != seen {
            debug!(%key, "discarding result fetched before invalidation");
            return false;
        }
        self.entries.insert(key, Entry { value, stored_at });
        drop(generation);
        true
    }

    /// Drop every entry belonging to one of `entities`. Returns how many
    /// entries were removed.
    pub fn invalidate(&self, entities: &[Entity]) -> usize {
        let mut removed = 0;
        for entity in entities {
            let mut generation = self.generations.entry(*entity).or_insert(0);
            *generation += 1;
            let before = self.entries.len();
            self.entries.retain(|key, _| key.entity() != *entity);
            removed += before.saturating_sub(self.entries.len());
            drop(generation);
        }
        debug!(?entities, removed, "cache invalidated");
        removed
    }

    /// Number of cached entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry and advance every generation, so fetches already in
    /// flight cannot repopulate the cache.
    pub fn clear(&self) {
        self.invalidate(&Entity::ALL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;
    use chrono::{Local, TimeZone};
    use std::sync::OnceLock;
    use std::sync::atomic::{AtomicBool, Ordering};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
                .single()
                .expect("valid timestamp"),
        ))
    }

    fn key(command: &str) -> CacheKey {
        CacheKey::for_command(command, &json!({"loggedUserId": 1})).expect("cache key")
    }

    fn cache_with(clock: &Arc<MutableClock>) -> QueryCache {
        let clock: Arc<dyn Clock> = clock.clone();
        QueryCache::new(clock)
    }

    #[rstest]
    fn stored_values_are_returned(clock: Arc<MutableClock>) {
        let cache = cache_with(&clock);
        let seen = cache.generation(Entity::Brands);
        assert!(cache.store(key("brands:list"), json!({"total": 0}), seen));
        assert_eq!(cache.get(&key("brands:list")), Some(json!({"total": 0})));
    }

    #[rstest]
    fn invalidation_removes_dependent_entities_only(clock: Arc<MutableClock>) {
        let cache = cache_with(&clock);
        for command in ["brands:list", "products:list", "customers:list"] {
            let entity = Entity::of_command(command).expect("entity");
            cache.store(key(command), json!(command), cache.generation(entity));
        }

        let removed = cache.invalidate(Entity::Brands.dependents());

        assert_eq!(removed, 2);
        assert!(cache.get(&key("brands:list")).is_none());
        assert!(cache.get(&key("products:list")).is_none());
        assert_eq!(cache.get(&key("customers:list")), Some(json!("customers:list")));
    }

    #[rstest]
    fn results_fetched_before_an_invalidation_are_discarded(clock: Arc<MutableClock>) {
        let cache = cache_with(&clock);
        let seen = cache.generation(Entity::Products);
        cache.invalidate(Entity::Brands.dependents());
        assert!(!cache.store(key("products:list"), json!([]), seen));
        assert!(cache.is_empty());
    }

    #[rstest]
    fn entries_expire_after_the_configured_duration(clock: Arc<MutableClock>) {
        let cache = cache_with(&clock).with_stale_after(Duration::from_secs(30));
        cache.store(key("users:list"), json!(1), cache.generation(Entity::Users));

        clock.advance(Duration::from_secs(29));
        assert_eq!(cache.get(&key("users:list")), Some(json!(1)));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get(&key("users:list")), None);
        assert!(cache.is_empty());
    }

    #[rstest]
    fn entries_without_expiry_survive_time(clock: Arc<MutableClock>) {
        let cache = cache_with(&clock);
        cache.store(key("users:list"), json!(1), cache.generation(Entity::Users));
        clock.advance(Duration::from_secs(86_400));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key("users:list")).is_some());
    }

    /// Clock that invalidates brands the first time it is read, landing a
    /// mutation in the middle of a store.
    struct InterruptingClock {
        now: DateTime<Utc>,
        cache: OnceLock<Arc<QueryCache>>,
        fired: AtomicBool,
    }

    impl Clock for InterruptingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            if !self.fired.swap(true, Ordering::SeqCst) {
                if let Some(cache) = self.cache.get() {
                    cache.invalidate(&[Entity::Brands]);
                }
            }
            self.now
        }
    }

    #[rstest]
    fn invalidation_during_a_store_wins(clock: Arc<MutableClock>) {
        let interrupting = Arc::new(InterruptingClock {
            now: clock.utc(),
            cache: OnceLock::new(),
            fired: AtomicBool::new(false),
        });
        let dyn_clock: Arc<dyn Clock> = interrupting.clone();
        let cache = Arc::new(QueryCache::new(dyn_clock));
        assert!(interrupting.cache.set(cache.clone()).is_ok());

        let seen = cache.generation(Entity::Brands);
        let stored = cache.store(key("brands:list"), json!("stale"), seen);

        assert!(!stored);
        assert_ne!(cache.generation(Entity::Brands), seen);
        assert!(cache.get(&key("brands:list")).is_none());
    }

    #[rstest]
    fn clearing_discards_fetches_in_flight(clock: Arc<MutableClock>) {
        let cache = cache_with(&clock);
        let seen = cache.generation(Entity::Orders);
        cache.clear();
        assert!(!cache.store(key("orders:list"), json!([]), seen));
        assert!(cache.is_empty());
    }
}
