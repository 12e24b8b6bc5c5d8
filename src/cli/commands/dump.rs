//! Dump command - full manifest as JSON

use crate::cli::args::DumpArgs;
use crate::cli::catalog::open_catalog;
use crate::config::Config;
use crate::error::PkgcatResult;
use crate::ui::UiContext;

/// Execute the dump command
pub fn execute(args: DumpArgs, config: &Config) -> PkgcatResult<()> {
    let catalog = open_catalog(config, &UiContext::detect())?;
    let pkg = catalog.get_package(&args.name)?;

    println!("{}", serde_json::to_string_pretty(&pkg)?);
    Ok(())
}
