//! Wiring from effective configuration to a ready catalog

use crate::cache::{partition_for_endpoint, CacheSettings};
use crate::catalog::{Fetcher, HttpFetcher, PackageCatalog, PACKAGES_API_PATH};
use crate::config::{Config, APP_NAME};
use crate::error::PkgcatResult;
use crate::ui::{FetchSpinner, UiContext};
use tracing::{debug, warn};

/// Fetcher decorator that shows a spinner while the wrapped request runs.
///
/// Sits under the cache, so cache hits never flash a spinner.
pub struct SpinnerFetcher<F> {
    inner: F,
    ui: UiContext,
}

impl<F: Fetcher> SpinnerFetcher<F> {
    pub fn new(inner: F, ui: UiContext) -> Self {
        Self { inner, ui }
    }
}

impl<F: Fetcher> Fetcher for SpinnerFetcher<F> {
    fn fetch(&self, path: &str) -> PkgcatResult<Vec<u8>> {
        let spinner = FetchSpinner::start(&self.ui, "Querying package catalog");
        let result = self.inner.fetch(path);
        spinner.finish();
        result
    }
}

/// Cache settings for the configured endpoint.
///
/// The partition is derived from the server URL and API path, so two
/// clusters never read each other's responses.
pub fn cache_settings(config: &Config) -> PkgcatResult<CacheSettings> {
    let partition = partition_for_endpoint(&config.server.url, PACKAGES_API_PATH);
    let mut settings =
        CacheSettings::new(APP_NAME, partition).with_lifetime(config.cache.lifetime()?);

    if let Some(ref dir) = config.cache.directory {
        settings = settings.with_directory(dir.clone());
    }

    Ok(settings)
}

/// Build the HTTP catalog, cached unless disabled.
///
/// A cache that cannot be started (locked by another process, unwritable
/// directory) is skipped with a warning and queries go straight to the server.
pub fn open_catalog(
    config: &Config,
    ui: &UiContext,
) -> PkgcatResult<PackageCatalog<SpinnerFetcher<HttpFetcher>>> {
    let fetcher = HttpFetcher::new(config.server.url.as_str(), config.server.timeout())
        .with_token(config.server.token.clone());
    let catalog = PackageCatalog::new(
        SpinnerFetcher::new(fetcher, ui.clone()),
        config.server.namespace.clone(),
    );

    if !config.cache.enabled {
        debug!("Response cache disabled");
        return Ok(catalog);
    }

    let settings = cache_settings(config)?;
    match settings.start() {
        Ok(handle) => Ok(catalog.with_cache(Box::new(handle))),
        Err(e) if e.is_cache_error() => {
            warn!("Response cache unavailable, querying server directly: {}", e);
            Ok(catalog)
        }
        Err(e) => Err(e),
    }
}
