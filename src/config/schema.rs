//! Configuration schema for pkgcat
//!
//! Configuration is stored at `~/.config/pkgcat/config.toml`

use crate::error::{PkgcatError, PkgcatResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote API server settings
    pub server: ServerConfig,

    /// Response cache settings
    pub cache: CacheConfig,
}

/// Remote API server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the API server (default: local `kubectl proxy`)
    pub url: String,

    /// Namespace the package manifests are listed in
    pub namespace: String,

    /// Bearer token sent with every request
    pub token: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8001".to_string(),
            namespace: "default".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache responses on disk (default: true)
    pub enabled: bool,

    /// How long cached responses stay fresh, e.g. "10m" ("0" = forever)
    pub lifetime: String,

    /// Where the cache database lives (default: platform cache dir)
    pub directory: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lifetime: "10m".to_string(),
            directory: None,
        }
    }
}

impl CacheConfig {
    /// Parsed lifetime; zero means entries never expire
    pub fn lifetime(&self) -> PkgcatResult<Duration> {
        parse_duration(&self.lifetime)
    }
}

/// Parse durations such as `45s`, `10m`, `1h30m`, `2d` or a bare number of seconds
pub fn parse_duration(input: &str) -> PkgcatResult<Duration> {
    let s = input.trim();
    let invalid = || PkgcatError::InvalidDuration(input.to_string());

    if s.is_empty() {
        return Err(invalid());
    }
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total: u64 = 0;
    let mut digits = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let unit = match c {
            's' => 1,
            'm' => 60,
            'h' => 60 * 60,
            'd' => 24 * 60 * 60,
            _ => return Err(invalid()),
        };
        let value: u64 = digits.parse().map_err(|_| invalid())?;
        total = value
            .checked_mul(unit)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(invalid)?;
        digits.clear();
    }

    if !digits.is_empty() {
        return Err(invalid());
    }

    Ok(Duration::from_secs(total))
}
