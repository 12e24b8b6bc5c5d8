//! Cache command - inspect or clear cached responses

use crate::cache::STORE_FILE_NAME;
use crate::cli::args::{CacheAction, CacheArgs};
use crate::cli::catalog::cache_settings;
use crate::config::Config;
use crate::error::PkgcatResult;
use crate::ui::{self, UiContext};
use tracing::info;

/// Execute the cache command
pub fn execute(args: CacheArgs, config: &Config) -> PkgcatResult<()> {
    match args.action {
        CacheAction::Path => show_path(config),
        CacheAction::Clear { yes } => clear(config, yes),
    }
}

/// Print the store file, then the partition used for the configured server
fn show_path(config: &Config) -> PkgcatResult<()> {
    let settings = cache_settings(config)?;

    println!("{}", settings.directory().join(STORE_FILE_NAME).display());

    let ctx = UiContext::detect();
    if ctx.is_interactive() {
        ui::key_value(&ctx, "Server", &config.server.url);
        ui::key_value(&ctx, "Partition", settings.partition());
        ui::key_value(&ctx, "Lifetime", &config.cache.lifetime);
    }

    Ok(())
}

fn clear(config: &Config, yes: bool) -> PkgcatResult<()> {
    let ctx = UiContext::detect().with_auto_yes(yes);
    let settings = cache_settings(config)?;

    let prompt = format!("Clear cached responses for {}?", config.server.url);
    if !ui::confirm(&ctx, &prompt, true)? {
        ui::step_info(&ctx, "Aborted");
        return Ok(());
    }

    let cache = settings.start()?;
    cache.clear()?;
    info!(
        "Cleared partition {} in {}",
        cache.partition(),
        cache.directory().display()
    );

    ui::step_ok_detail(&ctx, "Cache cleared", &config.server.url);

    Ok(())
}
