//! Durable key/value store backed by a single redb file
//!
//! Each partition is a redb table keyed by `&str` with raw byte values.
//! redb holds an exclusive lock on the file for as long as the database is
//! open, so a second opener fails fast instead of waiting.

use crate::error::{PkgcatError, PkgcatResult};
use redb::{Database, DatabaseError, ReadableTable, TableDefinition, TableError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the database inside the cache directory
pub const STORE_FILE_NAME: &str = "cache.db";

/// Partitioned get/put storage
///
/// A missing key (or a partition that was never created) is `Ok(None)`,
/// never an error.
pub trait KvStore {
    /// Create the partition if it does not exist yet. Safe to call repeatedly.
    fn ensure_partition(&self, partition: &str) -> PkgcatResult<()>;

    /// Read the value stored under `key`
    fn get(&self, partition: &str, key: &str) -> PkgcatResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&self, partition: &str, key: &str, value: &[u8]) -> PkgcatResult<()>;

    /// Remove every entry in the partition. Returns false if it did not exist.
    fn clear_partition(&self, partition: &str) -> PkgcatResult<bool>;
}

/// redb-backed store owning one open database file
pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl RedbStore {
    /// Open (or create) the database file inside `directory`
    pub fn open(directory: &Path) -> PkgcatResult<Self> {
        ensure_dir(directory)?;

        let path = directory.join(STORE_FILE_NAME);
        let db = Database::create(&path).map_err(|e| match e {
            DatabaseError::DatabaseAlreadyOpen => PkgcatError::StoreLocked { path: path.clone() },
            source => PkgcatError::StoreOpen {
                path: path.clone(),
                source,
            },
        })?;

        debug!("Opened cache database {}", path.display());
        Ok(Self { db, path })
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn table(partition: &str) -> TableDefinition<'_, &'static str, &'static [u8]> {
    TableDefinition::new(partition)
}

impl KvStore for RedbStore {
    fn ensure_partition(&self, partition: &str) -> PkgcatResult<()> {
        let txn = self.db.begin_write().map_err(PkgcatError::storage)?;
        txn.open_table(table(partition))
            .map_err(PkgcatError::storage)?;
        txn.commit().map_err(PkgcatError::storage)
    }

    fn get(&self, partition: &str, key: &str) -> PkgcatResult<Option<Vec<u8>>> {
        let txn = self.db.begin_read().map_err(PkgcatError::storage)?;
        let table = match txn.open_table(table(partition)) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(PkgcatError::storage(e)),
        };

        let value = table.get(key).map_err(PkgcatError::storage)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn put(&self, partition: &str, key: &str, value: &[u8]) -> PkgcatResult<()> {
        let txn = self.db.begin_write().map_err(PkgcatError::storage)?;
        {
            let mut table = txn
                .open_table(table(partition))
                .map_err(PkgcatError::storage)?;
            table.insert(key, value).map_err(PkgcatError::storage)?;
        }
        txn.commit().map_err(PkgcatError::storage)
    }

    fn clear_partition(&self, partition: &str) -> PkgcatResult<bool> {
        let txn = self.db.begin_write().map_err(PkgcatError::storage)?;
        let existed = txn
            .delete_table(table(partition))
            .map_err(PkgcatError::storage)?;
        txn.commit().map_err(PkgcatError::storage)?;
        Ok(existed)
    }
}

/// Create `path` as a directory, accepting one that already exists.
///
/// Fails if something other than a directory is already at `path`.
pub fn ensure_dir(path: &Path) -> PkgcatResult<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            return Err(PkgcatError::CacheDirNotDirectory {
                path: path.to_path_buf(),
            })
        }
        Err(_) => {}
    }

    fs::create_dir_all(path).map_err(|e| PkgcatError::CacheDirCreate {
        path: path.to_path_buf(),
        source: e,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o755);
        fs::set_permissions(path, perms).map_err(|e| PkgcatError::CacheDirCreate {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    Ok(())
}
