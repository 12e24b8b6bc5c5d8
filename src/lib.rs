//! pkgcat - Operator package catalog browser
//!
//! Queries package manifests from a cluster's package API through a
//! durable, expiring response cache and narrows them with composable
//! filters.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod ui;

pub use error::{PkgcatError, PkgcatResult};
