//! Expiring read-through cache over a `KvStore`
//!
//! Every stored value is wrapped in an envelope carrying the time it was
//! written. Entries older than the configured lifetime read as absent.

use super::store::{KvStore, RedbStore};
use crate::error::{PkgcatError, PkgcatResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Cache of raw responses keyed by resource path
pub trait ResponseCache {
    /// Read a usable (present and unexpired) value
    fn get(&self, key: &str) -> PkgcatResult<Option<Vec<u8>>>;

    /// Store a freshly fetched value
    fn put(&self, key: &str, value: &[u8]) -> PkgcatResult<()>;

    /// Return the cached value for `key`, or call `fetch` and cache its result.
    ///
    /// Cache failures never fail the call: a broken read counts as a miss and
    /// a broken write is logged and skipped. Fetch failures always propagate.
    fn retrieve_or_fetch(
        &self,
        key: &str,
        fetch: &mut dyn FnMut() -> PkgcatResult<Vec<u8>>,
    ) -> PkgcatResult<Vec<u8>> {
        let cached = self.get(key).unwrap_or_else(|e| {
            warn!("Cache read for {} failed: {}", key, e);
            None
        });

        if let Some(data) = cached {
            debug!("Cache hit for {}", key);
            return Ok(data);
        }

        debug!("Cache miss for {}", key);
        let data = fetch()?;

        if let Err(e) = self.put(key, &data) {
            warn!("Cache store for {} failed: {}", key, e);
        }

        Ok(data)
    }
}

/// Cache that never holds anything; every lookup goes to the fetcher
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

impl ResponseCache for NullCache {
    fn get(&self, _key: &str) -> PkgcatResult<Option<Vec<u8>>> {
        Ok(None)
    }

    fn put(&self, _key: &str, _value: &[u8]) -> PkgcatResult<()> {
        Ok(())
    }
}

/// Stored wrapper around a cached value
#[derive(Debug, Clone, PartialEq)]
struct Envelope {
    value: Vec<u8>,
    stored_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
struct EnvelopeRepr {
    value: String,
    stored_at: DateTime<Utc>,
}

impl Envelope {
    fn seal(value: &[u8]) -> Self {
        Self {
            value: value.to_vec(),
            stored_at: Utc::now(),
        }
    }

    fn encode(&self) -> PkgcatResult<Vec<u8>> {
        let repr = EnvelopeRepr {
            value: STANDARD.encode(&self.value),
            stored_at: self.stored_at,
        };
        Ok(serde_json::to_vec(&repr)?)
    }

    fn decode(data: &[u8]) -> PkgcatResult<Self> {
        let repr: EnvelopeRepr =
            serde_json::from_slice(data).map_err(|e| PkgcatError::decode("cache entry", e))?;
        let value = STANDARD
            .decode(repr.value.as_bytes())
            .map_err(|e| PkgcatError::Envelope(format!("bad payload encoding: {}", e)))?;

        Ok(Self {
            value,
            stored_at: repr.stored_at,
        })
    }

    /// An entry written in the future (clock skew) counts as fresh.
    fn is_expired(&self, lifetime: Option<Duration>, now: DateTime<Utc>) -> bool {
        let Some(lifetime) = lifetime else {
            return false;
        };

        match (now - self.stored_at).to_std() {
            Ok(age) => age > lifetime,
            Err(_) => false,
        }
    }
}

/// Unstarted cache configuration
#[derive(Debug, Clone)]
pub struct CacheSettings {
    directory: PathBuf,
    partition: String,
    lifetime: Option<Duration>,
}

impl CacheSettings {
    /// Settings for `partition`, stored under the platform cache directory
    pub fn new(app_name: &str, partition: impl Into<String>) -> Self {
        Self {
            directory: default_cache_dir(app_name),
            partition: partition.into(),
            lifetime: None,
        }
    }

    /// Set how long entries stay usable. Zero means forever.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = (!lifetime.is_zero()).then_some(lifetime);
        self
    }

    /// Store the database somewhere other than the platform cache directory
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    /// Create the directory and partition if needed and open the store
    pub fn start(self) -> PkgcatResult<CacheHandle<RedbStore>> {
        let store = RedbStore::open(&self.directory)?;
        self.start_with(store)
    }

    /// Start on an already opened store
    pub fn start_with<S: KvStore>(self, store: S) -> PkgcatResult<CacheHandle<S>> {
        store.ensure_partition(&self.partition)?;
        debug!(
            "Cache started in {} (partition {}, lifetime {:?})",
            self.directory.display(),
            self.partition,
            self.lifetime
        );

        Ok(CacheHandle {
            store,
            directory: self.directory,
            partition: self.partition,
            lifetime: self.lifetime,
        })
    }
}

/// Platform cache home joined with the application name
pub fn default_cache_dir(app_name: &str) -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(app_name)
}

/// A started cache bound to one partition of one open store
pub struct CacheHandle<S: KvStore = RedbStore> {
    store: S,
    directory: PathBuf,
    partition: String,
    lifetime: Option<Duration>,
}

impl<S: KvStore> CacheHandle<S> {
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    pub fn lifetime(&self) -> Option<Duration> {
        self.lifetime
    }

    /// Drop every entry in this handle's partition and recreate it empty
    pub fn clear(&self) -> PkgcatResult<bool> {
        let existed = self.store.clear_partition(&self.partition)?;
        self.store.ensure_partition(&self.partition)?;
        Ok(existed)
    }
}

impl<S: KvStore> ResponseCache for CacheHandle<S> {
    fn get(&self, key: &str) -> PkgcatResult<Option<Vec<u8>>> {
        let Some(data) = self.store.get(&self.partition, key)? else {
            return Ok(None);
        };

        let envelope = Envelope::decode(&data)?;
        if envelope.is_expired(self.lifetime, Utc::now()) {
            debug!("Cached {} expired (stored at {})", key, envelope.stored_at);
            return Ok(None);
        }

        Ok(Some(envelope.value))
    }

    fn put(&self, key: &str, value: &[u8]) -> PkgcatResult<()> {
        let data = Envelope::seal(value).encode()?;
        self.store.put(&self.partition, key, &data)
    }
}
