//! CLI argument definitions using clap derive

use crate::config::Config;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// pkgcat - Browse an operator package catalog
///
/// Lists and inspects package manifests served by a cluster API, with
/// responses cached on disk for a configurable lifetime.
#[derive(Parser, Debug)]
#[command(name = "pkgcat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(long, global = true, env = "PKGCAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// API server URL
    #[arg(long, global = true, env = "PKGCAT_SERVER")]
    pub server: Option<String>,

    /// Bearer token for the API server
    #[arg(long, global = true, env = "PKGCAT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Namespace to list package manifests in
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// How long cached responses stay fresh (e.g. 10m, 1h, 0 = forever)
    #[arg(long, global = true)]
    pub cache_lifetime: Option<String>,

    /// Cache directory
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Bypass the response cache for this run
    #[arg(long, global = true)]
    pub no_cache: bool,
}

impl Cli {
    /// Layer command-line overrides on top of the file configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref server) = self.server {
            config.server.url = server.clone();
        }
        if let Some(ref token) = self.token {
            config.server.token = Some(token.clone());
        }
        if let Some(ref namespace) = self.namespace {
            config.server.namespace = namespace.clone();
        }
        if let Some(ref lifetime) = self.cache_lifetime {
            config.cache.lifetime = lifetime.clone();
        }
        if let Some(ref dir) = self.cache_dir {
            config.cache.directory = Some(dir.clone());
        }
        if self.no_cache {
            config.cache.enabled = false;
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List packages matching every given filter
    List(ListArgs),

    /// Show a summary of one package
    Show(ShowArgs),

    /// Print the full manifest of one package as JSON
    Dump(DumpArgs),

    /// Inspect or clear the response cache
    Cache(CacheArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Package names to match (substrings, or globs with --glob)
    pub names: Vec<String>,

    /// Treat NAMES as shell globs anchored to the whole name
    #[arg(short, long)]
    pub glob: bool,

    /// Catalog source id or display name contains TEXT
    #[arg(short = 'c', long, value_name = "TEXT")]
    pub catalog_source: Option<String>,

    /// Long description contains TEXT
    #[arg(short, long, value_name = "TEXT")]
    pub description: Option<String>,

    /// Supports install mode (OwnNamespace, SingleNamespace, MultiNamespace, AllNamespaces)
    #[arg(short = 'm', long, value_name = "MODE")]
    pub install_mode: Option<String>,

    /// Lists keyword (repeatable, any may match)
    #[arg(short = 'w', long = "keyword", value_name = "KEYWORD")]
    pub keywords: Vec<String>,

    /// Certified annotation equals true/false
    #[arg(long, value_name = "BOOL")]
    pub certified: Option<bool>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Package name
    pub name: String,

    /// Include the default channel's long description
    #[arg(short, long)]
    pub description: bool,
}

/// Arguments for the dump command
#[derive(Parser, Debug)]
pub struct DumpArgs {
    /// Package name
    pub name: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., server.url)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for list command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one name per line)
    Plain,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show where cached responses for the current server are kept
    Path,

    /// Drop cached responses for the current server
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
