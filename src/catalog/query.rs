//! Catalog queries through the response cache

use super::fetch::Fetcher;
use super::filter::{matches_all, Filter};
use super::manifest::{PackageManifest, PackageManifestList};
use crate::cache::{NullCache, ResponseCache};
use crate::error::{PkgcatError, PkgcatResult};
use tracing::debug;

/// API group/version serving package manifests
pub const PACKAGES_API_PATH: &str = "/apis/packages.operators.coreos.com/v1";

/// Read-only view of the remote package catalog
pub struct PackageCatalog<F: Fetcher> {
    fetcher: F,
    cache: Box<dyn ResponseCache>,
    namespace: String,
}

impl<F: Fetcher> PackageCatalog<F> {
    /// Create an uncached catalog for `namespace`
    pub fn new(fetcher: F, namespace: impl Into<String>) -> Self {
        Self {
            fetcher,
            cache: Box::new(NullCache),
            namespace: namespace.into(),
        }
    }

    /// Route every fetch through `cache`
    pub fn with_cache(mut self, cache: Box<dyn ResponseCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Path of the manifest collection
    pub fn list_path(&self) -> String {
        format!(
            "{}/namespaces/{}/packagemanifests",
            PACKAGES_API_PATH, self.namespace
        )
    }

    /// Path of a single manifest
    pub fn package_path(&self, name: &str) -> String {
        format!("{}/{}", self.list_path(), name)
    }

    fn get_cached(&self, path: &str) -> PkgcatResult<Vec<u8>> {
        self.cache
            .retrieve_or_fetch(path, &mut || self.fetcher.fetch(path))
    }

    /// Fetch one package by name.
    ///
    /// Names that cannot address a single manifest, and responses that
    /// describe some other object, are reported as not found.
    pub fn get_package(&self, name: &str) -> PkgcatResult<PackageManifest> {
        if name.is_empty() || name.contains('/') {
            return Err(PkgcatError::PackageNotFound(name.to_string()));
        }

        let path = self.package_path(name);
        let data = self.get_cached(&path).map_err(|e| match e {
            PkgcatError::ResourceNotFound { .. } => PkgcatError::PackageNotFound(name.to_string()),
            other => other,
        })?;

        let pkg: PackageManifest = serde_json::from_slice(&data)
            .map_err(|e| PkgcatError::decode(format!("package manifest {}", name), e))?;

        if !pkg.name().eq_ignore_ascii_case(name) {
            debug!("Response for {} describes {:?}", path, pkg.name());
            return Err(PkgcatError::PackageNotFound(name.to_string()));
        }

        Ok(pkg)
    }

    /// Fetch the whole catalog and keep the packages every filter accepts.
    ///
    /// Matches keep their listing order.
    pub fn list_packages(&self, filters: &[Filter]) -> PkgcatResult<Vec<PackageManifest>> {
        let data = self.get_cached(&self.list_path())?;
        let list: PackageManifestList = serde_json::from_slice(&data)
            .map_err(|e| PkgcatError::decode("package manifest list", e))?;

        let total = list.items.len();
        let selected: Vec<PackageManifest> = list
            .items
            .into_iter()
            .filter(|pkg| matches_all(filters, pkg))
            .collect();

        debug!(
            "Selected {} of {} packages with {} filter(s)",
            selected.len(),
            total,
            filters.len()
        );
        Ok(selected)
    }
}
