//! Error types for pkgcat
//!
//! All modules use `PkgcatResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pkgcat operations
pub type PkgcatResult<T> = Result<T, PkgcatError>;

/// All errors that can occur in pkgcat
#[derive(Error, Debug)]
pub enum PkgcatError {
    // Cache storage errors
    #[error("Cache path exists but is not a directory: {path}")]
    CacheDirNotDirectory { path: PathBuf },

    #[error("Failed to create cache directory {path}: {source}")]
    CacheDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open cache database {path}: {source}")]
    StoreOpen {
        path: PathBuf,
        #[source]
        source: redb::DatabaseError,
    },

    #[error("Cache database {path} is locked by another process")]
    StoreLocked { path: PathBuf },

    #[error("Cache storage error: {0}")]
    Storage(String),

    // Remote fetch errors
    #[error("Failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },

    #[error("Remote resource not found: {path}")]
    ResourceNotFound { path: String },

    #[error("Package not found: {0}")]
    PackageNotFound(String),

    // Decoding errors
    #[error("Failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed cache entry: {0}")]
    Envelope(String),

    // Filter errors
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid duration '{0}'. Use forms like 90s, 10m, 1h30m or 0")]
    InvalidDuration(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl PkgcatError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Wrap any storage engine failure that happens after the store is open
    pub fn storage(err: impl Into<redb::Error>) -> Self {
        Self::Storage(err.into().to_string())
    }

    /// Create a decode error with context
    pub fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }

    /// Create a fetch error for a resource path
    pub fn fetch(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if the remote side reported the target as absent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ResourceNotFound { .. } | Self::PackageNotFound(_)
        )
    }

    /// Check if the error comes from the local cache rather than the remote
    pub fn is_cache_error(&self) -> bool {
        matches!(
            self,
            Self::CacheDirNotDirectory { .. }
                | Self::CacheDirCreate { .. }
                | Self::StoreOpen { .. }
                | Self::StoreLocked { .. }
                | Self::Storage(_)
                | Self::Envelope(_)
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::StoreLocked { .. } => {
                Some("Wait for the other pkgcat process to exit, or pass --no-cache")
            }
            Self::Fetch { .. } => {
                Some("Check --server, or start a local API proxy with: kubectl proxy")
            }
            Self::PackageNotFound(_) => Some("Run: pkgcat list to see available packages"),
            Self::InvalidPattern { .. } => Some("Drop --glob to match names as plain substrings"),
            Self::ConfigInvalid { .. } => Some("Run: pkgcat config init --force"),
            _ => None,
        }
    }
}
