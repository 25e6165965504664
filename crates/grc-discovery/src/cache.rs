//! In-memory schema and endpoint caches.
//!
//! Two independent stores share one shape: a bounded map with a per-entry
//! deadline and least-recently-used eviction. Expiry is checked on every read
//! so a hit never returns a stale entry, whatever order the writes arrived in.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use grc_config::CacheConfig;
use grc_core::entities::{ApplicationSchema, SchemaKey};
use serde::Serialize;

// ── TtlLru ─────────────────────────────────────────────────────────

struct Slot<V> {
    value: V,
    expires_at: Instant,
    /// Position in the recency index; larger is more recent.
    stamp: u64,
}

struct Entries<K, V> {
    slots: HashMap<K, Slot<V>>,
    /// `stamp -> key`, oldest first.
    recency: BTreeMap<u64, K>,
    tick: u64,
}

impl<K: Clone + Eq + Hash, V> Entries<K, V> {
    fn next_stamp(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn remove(&mut self, key: &K) -> Option<Slot<V>> {
        let slot = self.slots.remove(key)?;
        self.recency.remove(&slot.stamp);
        Some(slot)
    }

    fn purge_expired(&mut self, now: Instant) {
        let expired: Vec<K> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            self.remove(key);
        }
    }

    fn evict_oldest(&mut self) {
        if let Some((_, key)) = self.recency.pop_first() {
            self.slots.remove(&key);
        }
    }
}

/// A bounded key-value store whose entries expire after a fixed lifetime.
///
/// All operations take one short-lived lock, so a reader either sees the
/// previous value or the new one, never a mix. Values are replaced whole.
pub struct TtlLru<K, V> {
    entries: Mutex<Entries<K, V>>,
    capacity: usize,
    ttl: Duration,
}

impl<K: Clone + Eq + Hash, V: Clone> TtlLru<K, V> {
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(Entries {
                slots: HashMap::new(),
                recency: BTreeMap::new(),
                tick: 0,
            }),
            capacity,
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries<K, V>> {
        // Entries are never left half-updated across a panic point.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The live value for `key`, marking it most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.lock();

        let expired = entries.slots.get(key)?.expires_at <= now;
        if expired {
            entries.remove(key);
            return None;
        }

        let stamp = entries.next_stamp();
        let slot = entries.slots.get_mut(key)?;
        let previous = std::mem::replace(&mut slot.stamp, stamp);
        let value = slot.value.clone();
        entries.recency.remove(&previous);
        entries.recency.insert(stamp, key.clone());
        Some(value)
    }

    /// Insert or replace `key` with a fresh lifetime.
    ///
    /// Expired entries are dropped first; if the store is still over
    /// capacity, least-recently-used entries are evicted.
    pub fn insert(&self, key: K, value: V) {
        let now = Instant::now();
        let mut entries = self.lock();

        entries.remove(&key);
        entries.purge_expired(now);

        let stamp = entries.next_stamp();
        entries.recency.insert(stamp, key.clone());
        entries.slots.insert(
            key,
            Slot {
                value,
                expires_at: now + self.ttl,
                stamp,
            },
        );

        while entries.slots.len() > self.capacity {
            entries.evict_oldest();
        }
    }

    /// Remove `key`, returning whether it was present.
    pub fn remove(&self, key: &K) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.slots.clear();
        entries.recency.clear();
    }

    /// Number of stored entries, including any that expired but were not
    /// yet touched.
    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

// ── SchemaCache ────────────────────────────────────────────────────

/// Entry counts for both stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub schemas: usize,
    pub schema_capacity: usize,
    pub endpoint_lists: usize,
    pub endpoint_capacity: usize,
}

/// Schemas keyed by `(tenant, application)` and endpoint lists keyed by
/// tenant.
///
/// Construct one per process and share it behind an [`Arc`]; tests build
/// their own for isolation.
pub struct SchemaCache {
    schemas: TtlLru<SchemaKey, Arc<ApplicationSchema>>,
    endpoints: TtlLru<String, Arc<Vec<String>>>,
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl SchemaCache {
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            schemas: TtlLru::new(config.schema_capacity, config.ttl()),
            endpoints: TtlLru::new(config.endpoint_capacity, config.ttl()),
        }
    }

    pub fn get_schema(&self, tenant_id: &str, application_id: i64) -> Option<Arc<ApplicationSchema>> {
        self.schemas.get(&SchemaKey::new(tenant_id, application_id))
    }

    /// Store `schema` under its own application id and return the shared copy.
    pub fn set_schema(&self, tenant_id: &str, schema: ApplicationSchema) -> Arc<ApplicationSchema> {
        let key = SchemaKey::new(tenant_id, schema.application_id);
        let schema = Arc::new(schema);
        self.schemas.insert(key, Arc::clone(&schema));
        schema
    }

    pub fn get_endpoints(&self, tenant_id: &str) -> Option<Arc<Vec<String>>> {
        self.endpoints.get(&tenant_id.to_string())
    }

    pub fn set_endpoints(&self, tenant_id: &str, endpoints: Vec<String>) -> Arc<Vec<String>> {
        let endpoints = Arc::new(endpoints);
        self.endpoints
            .insert(tenant_id.to_string(), Arc::clone(&endpoints));
        endpoints
    }

    /// Drop one application's schema. Returns whether an entry was present.
    pub fn invalidate_schema(&self, tenant_id: &str, application_id: i64) -> bool {
        self.schemas.remove(&SchemaKey::new(tenant_id, application_id))
    }

    /// Drop one tenant's endpoint list. Returns whether an entry was present.
    pub fn invalidate_endpoints(&self, tenant_id: &str) -> bool {
        self.endpoints.remove(&tenant_id.to_string())
    }

    /// Empty both stores. Idempotent.
    pub fn clear(&self) {
        self.schemas.clear();
        self.endpoints.clear();
        tracing::info!("schema cache cleared");
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            schemas: self.schemas.len(),
            schema_capacity: self.schemas.capacity(),
            endpoint_lists: self.endpoints.len(),
            endpoint_capacity: self.endpoints.capacity(),
        }
    }
}
