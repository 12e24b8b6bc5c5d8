//! Package catalog queries
//!
//! Fetches package manifests from the package API (through the response
//! cache) and narrows them down with composable filters.

pub mod fetch;
pub mod filter;
pub mod manifest;
pub mod query;

pub use fetch::{Fetcher, HttpFetcher};
pub use filter::{
    match_catalog_source, match_certified, match_description, match_install_mode,
    match_keywords, match_name, match_name_globs, match_name_substrings, matches_all, Filter,
};
pub use manifest::{
    CsvDescription, InstallMode, PackageChannel, PackageManifest, PackageManifestList,
    PackageStatus,
};
pub use query::{PackageCatalog, PACKAGES_API_PATH};
