use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::error::Error;
use crate::jwk::Jwk;

/// Storage for keys fetched from a JWKS endpoint.
///
/// `JwkClient` calls `get` under a shared lock and `add` under an exclusive
/// one, so implementations need no locking of their own. `add` may see the
/// same key set several times when concurrent misses share one fetch; it must
/// stay idempotent.
pub trait KeyCacher: Send + Sync {
    fn get(&self, kid: &str) -> Result<Jwk, Error>;

    /// Merges a freshly fetched key set and returns the key for `kid`, or
    /// `KeyNotFound` when the set doesn't carry it.
    fn add(&mut self, kid: &str, keys: &[Jwk]) -> Result<Jwk, Error>;
}

#[derive(Debug, Clone)]
struct Entry {
    key: Jwk,
    added_at: Instant,
}

#[derive(Debug)]
enum Entries {
    /// Every key of every fetched set.
    All(HashMap<String, Entry>),
    /// Requested keys only. Reads use `peek`, so eviction follows insertion
    /// order rather than access.
    Recent(LruCache<String, Entry>),
    /// Bounded to zero keys.
    Disabled,
}

/// In-memory key cacher.
///
/// Without a `max_cache_size` every key of every fetched set is kept. With one,
/// only requested keys are kept and the oldest are evicted past the limit.
/// Entries older than `max_key_age`, when set, read as missing.
#[derive(Debug)]
pub struct MemoryKeyCacher {
    entries: Entries,
    max_key_age: Option<Duration>,
}

impl Default for MemoryKeyCacher {
    fn default() -> Self {
        Self::persistent()
    }
}

impl MemoryKeyCacher {
    pub fn persistent() -> Self {
        Self::new(None, None)
    }

    pub fn new(max_key_age: Option<Duration>, max_cache_size: Option<usize>) -> Self {
        let entries = match max_cache_size {
            None => Entries::All(HashMap::new()),
            Some(size) => match NonZeroUsize::new(size) {
                Some(size) => Entries::Recent(LruCache::new(size)),
                None => Entries::Disabled,
            },
        };
        Self {
            entries,
            max_key_age,
        }
    }

    pub fn len(&self) -> usize {
        match &self.entries {
            Entries::All(map) => map.len(),
            Entries::Recent(lru) => lru.len(),
            Entries::Disabled => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        match self.max_key_age {
            Some(age) => entry.added_at.elapsed() > age,
            None => false,
        }
    }
}

impl KeyCacher for MemoryKeyCacher {
    fn get(&self, kid: &str) -> Result<Jwk, Error> {
        let entry = match &self.entries {
            Entries::All(map) => map.get(kid),
            Entries::Recent(lru) => lru.peek(kid),
            Entries::Disabled => None,
        };
        match entry {
            Some(entry) if !self.is_expired(entry) => Ok(entry.key.clone()),
            _ => Err(Error::KeyNotFound(kid.to_owned())),
        }
    }

    fn add(&mut self, kid: &str, keys: &[Jwk]) -> Result<Jwk, Error> {
        let now = Instant::now();
        let found = keys.iter().rev().find(|key| key.kid == kid).cloned();

        match &mut self.entries {
            Entries::All(map) => {
                for key in keys {
                    map.insert(
                        key.kid.clone(),
                        Entry {
                            key: key.clone(),
                            added_at: now,
                        },
                    );
                }
            }
            Entries::Recent(lru) => {
                if let Some(key) = &found {
                    let entry = Entry {
                        key: key.clone(),
                        added_at: now,
                    };
                    if let Some((evicted, _)) = lru.push(key.kid.clone(), entry) {
                        if evicted != key.kid {
                            log::debug!("action=evict kid={}", evicted);
                        }
                    }
                }
            }
            Entries::Disabled => {}
        }

        found.ok_or_else(|| Error::KeyNotFound(kid.to_owned()))
    }
}
