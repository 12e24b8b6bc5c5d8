//! Persistent response cache
//!
//! Sits in front of remote fetches so repeated queries inside the freshness
//! window are answered from disk.
//!
//! # Layers
//!
//! | Layer | Type | Role |
//! |-------|------|------|
//! | Store | `RedbStore` | Single-file transactional KV, one table per partition |
//! | Cache | `CacheHandle` | Timestamp envelope + lifetime check on read |
//! | Disabled | `NullCache` | Always misses, never stores |
//!
//! Cache trouble is never fatal to a query: read failures count as misses
//! and write failures are logged and skipped.

pub mod expiring;
pub mod key;
pub mod store;

pub use expiring::{default_cache_dir, CacheHandle, CacheSettings, NullCache, ResponseCache};
pub use key::partition_for_endpoint;
pub use store::{ensure_dir, KvStore, RedbStore, STORE_FILE_NAME};
