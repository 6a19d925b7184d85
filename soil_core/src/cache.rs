//! # Profile Cache
//!
//! Bounded least-recently-used memo of computed profiles, keyed by a
//! fingerprint of the request. The engine is pure; memoization lives at the
//! request boundary (see [`crate::api::handle_cached`]).
//!
//! Only successful results are stored.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::SoilResult;
use crate::settings::EngineSettings;
use crate::stresses::{StressProfileInput, StressProfileResult};

/// Default number of profiles kept by the process-wide cache
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Canonical key for a request: its JSON plus the settings it ran with.
pub fn fingerprint(input: &StressProfileInput, settings: &EngineSettings) -> SoilResult<String> {
    Ok(serde_json::to_string(&(input, settings))?)
}

/// Cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hit rate in percent (0 when nothing was requested yet).
    pub fn hit_rate(&self) -> f64 {
        match self.total_requests() {
            0 => 0.0,
            total => self.hits as f64 / total as f64 * 100.0,
        }
    }
}

/// LRU memo of stress profiles.
#[derive(Debug)]
pub struct ProfileCache {
    capacity: usize,
    entries: HashMap<String, StressProfileResult>,
    /// Least recently used at the front
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

impl Default for ProfileCache {
    fn default() -> Self {
        ProfileCache::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl ProfileCache {
    /// Cache holding at most `capacity` profiles (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        ProfileCache {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }

    /// Look up a profile, marking it most recently used.
    pub fn get(&mut self, key: &str) -> Option<StressProfileResult> {
        match self.entries.get(key).cloned() {
            Some(result) => {
                self.hits += 1;
                self.touch(key);
                debug!(hits = self.hits, "profile cache hit");
                Some(result)
            }
            None => {
                self.misses += 1;
                debug!(misses = self.misses, "profile cache miss");
                None
            }
        }
    }

    /// Store a profile, evicting the least recently used one when full.
    pub fn insert(&mut self, key: String, result: StressProfileResult) {
        if self.entries.contains_key(&key) {
            self.touch(&key);
            self.entries.insert(key, result);
            return;
        }
        if self.entries.len() >= self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.entries.remove(&evicted);
                debug!("profile cache eviction");
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
        }
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
