//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{parse_duration, Config, ConfigManager};
use crate::error::{PkgcatError, PkgcatResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

/// Keys accepted by `config set`
const VALID_KEYS: &[&str] = &[
    "server.url",
    "server.namespace",
    "server.token",
    "server.timeout_secs",
    "cache.enabled",
    "cache.lifetime",
    "cache.directory",
];

/// Execute the config command
pub fn execute(args: ConfigArgs, manager: &ConfigManager, config: &Config) -> PkgcatResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => show_path(manager),
        Some(ConfigAction::Init { force }) => init_config(manager, force)?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, &key, &value)?,
    }

    Ok(())
}

/// Placeholder printed instead of secrets
const REDACTED: &str = "<redacted>";

fn show_config(config: &Config) -> PkgcatResult<()> {
    println!("{}", render_config(config)?);
    Ok(())
}

/// Effective configuration as TOML with the bearer token masked
fn render_config(config: &Config) -> PkgcatResult<String> {
    let mut shown = config.clone();
    if shown.server.token.is_some() {
        shown.server.token = Some(REDACTED.to_string());
    }
    Ok(toml::to_string_pretty(&shown)?)
}

/// Value as echoed back to the terminal
fn display_value<'a>(key: &str, value: &'a str) -> &'a str {
    if key == "server.token" && !value.is_empty() {
        REDACTED
    } else {
        value
    }
}

fn show_path(manager: &ConfigManager) {
    println!("{}", manager.path().display());
}

fn init_config(manager: &ConfigManager, force: bool) -> PkgcatResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default())?;

    ui::step_ok_detail(
        &ctx,
        "Configuration initialized",
        &path.display().to_string(),
    );

    Ok(())
}

/// Update one key in the file configuration (not the flag-overridden view)
fn set_value(manager: &ConfigManager, key: &str, value: &str) -> PkgcatResult<()> {
    let mut config = manager.load()?;
    apply_key(&mut config, key, value)?;
    manager.save(&config)?;

    ui::step_ok(
        &UiContext::detect(),
        &format!("Set {} = {}", key, display_value(key, value)),
    );
    Ok(())
}

fn apply_key(config: &mut Config, key: &str, value: &str) -> PkgcatResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["server", "url"] => config.server.url = value.to_string(),
        ["server", "namespace"] => config.server.namespace = value.to_string(),
        ["server", "token"] => config.server.token = optional(value),
        ["server", "timeout_secs"] => config.server.timeout_secs = parse_u64(value)?,

        ["cache", "enabled"] => config.cache.enabled = parse_bool(value)?,
        ["cache", "lifetime"] => {
            parse_duration(value)?;
            config.cache.lifetime = value.to_string();
        }
        ["cache", "directory"] => config.cache.directory = optional(value).map(PathBuf::from),

        _ => {
            return Err(PkgcatError::User(format!(
                "Unknown config key: {} (valid keys: {})",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }

    Ok(())
}

/// Empty string clears an optional setting
fn optional(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_bool(value: &str) -> PkgcatResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(PkgcatError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn parse_u64(value: &str) -> PkgcatResult<u64> {
    value
        .parse()
        .map_err(|_| PkgcatError::User(format!("Invalid number: {}", value)))
}
