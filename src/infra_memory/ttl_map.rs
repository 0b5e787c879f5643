use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

const DEFAULT_SWEEP_INTERVAL: usize = 1024;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// String map whose entries vanish once their TTL elapses.
///
/// A read drops the expired entry it sees. Every `sweep_interval` inserts
/// the whole map is swept, so keys that are never read again still go.
pub struct TtlMap {
    entries: DashMap<String, Entry>,
    inserts: AtomicUsize,
    sweep_interval: usize,
}

impl Default for TtlMap {
    fn default() -> Self {
        Self::with_sweep_interval(DEFAULT_SWEEP_INTERVAL)
    }
}

impl TtlMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sweep_interval(sweep_interval: usize) -> Self {
        Self {
            entries: DashMap::new(),
            inserts: AtomicUsize::new(0),
            sweep_interval: sweep_interval.max(1),
        }
    }

    /// Entries held, expired ones included until they are evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sweep(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    pub fn insert(&self, key: &str, value: &str, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        let inserted = self.inserts.fetch_add(1, Ordering::Relaxed) + 1;
        if inserted % self.sweep_interval == 0 {
            self.sweep();
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                return Some(entry.value.clone());
            }
        }
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        None
    }

    pub fn remove(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .remove(key)
            .is_some_and(|(_, entry)| entry.expires_at > now)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
