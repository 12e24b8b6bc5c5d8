//! Show command - summary of one package

use crate::catalog::PackageManifest;
use crate::cli::args::ShowArgs;
use crate::cli::catalog::open_catalog;
use crate::config::Config;
use crate::error::PkgcatResult;
use crate::ui::{self, UiContext};
use console::style;

/// Execute the show command
pub fn execute(args: ShowArgs, config: &Config) -> PkgcatResult<()> {
    let ctx = UiContext::detect();
    let catalog = open_catalog(config, &ctx)?;
    let pkg = catalog.get_package(&args.name)?;

    print_summary(&ctx, &pkg);

    if args.description {
        ui::section(&ctx, "Description");
        let description = pkg.default_description();
        if description.is_empty() {
            ui::remark(&ctx, "(none)");
        } else {
            println!("{}", description.trim_end());
        }
    }

    Ok(())
}

fn print_summary(ctx: &UiContext, pkg: &PackageManifest) {
    let status = &pkg.status;

    ui::intro(ctx, pkg.name());
    ui::key_value(ctx, "Display name", pkg.display_name());
    ui::key_value(
        ctx,
        "Catalog",
        &format!(
            "{} ({})",
            status.catalog_source_display_name, status.catalog_source
        ),
    );
    ui::key_value(ctx, "Publisher", &status.catalog_source_publisher);
    ui::key_value(ctx, "Provider", &status.provider.name);
    ui::key_value(ctx, "Keywords", &pkg.default_keywords().join(", "));
    ui::key_value(ctx, "Install modes", &pkg.default_install_modes().join(", "));

    ui::section(ctx, "Channels");
    for line in channel_lines(pkg) {
        println!("{}", line);
    }
}

/// One line per channel, default channel starred
fn channel_lines(pkg: &PackageManifest) -> Vec<String> {
    pkg.channels()
        .iter()
        .map(|channel| {
            let marker = if channel.name == pkg.default_channel_name() {
                style("*").green().to_string()
            } else {
                " ".to_string()
            };
            let version = &channel.current_csv_desc.version;
            if version.is_empty() {
                format!("  {} {:<16} {}", marker, channel.name, channel.current_csv)
            } else {
                format!(
                    "  {} {:<16} {} ({})",
                    marker, channel.name, channel.current_csv, version
                )
            }
        })
        .collect()
}
