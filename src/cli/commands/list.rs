//! List command - query packages with composable filters

use crate::catalog::{
    match_catalog_source, match_certified, match_description, match_install_mode,
    match_keywords, match_name_globs, match_name_substrings, Filter, PackageManifest,
};
use crate::cli::args::{ListArgs, OutputFormat};
use crate::cli::catalog::open_catalog;
use crate::config::Config;
use crate::error::PkgcatResult;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;

/// Execute the list command
pub fn execute(args: ListArgs, config: &Config) -> PkgcatResult<()> {
    let ctx = UiContext::detect();
    let filters = build_filters(&args)?;
    let catalog = open_catalog(config, &ctx)?;
    let packages = catalog.list_packages(&filters)?;

    if packages.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => ui::step_info(&ctx, "No matching packages"),
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&packages),
        OutputFormat::Json => print_json(&packages)?,
        OutputFormat::Plain => print_plain(&packages),
    }

    Ok(())
}

/// Turn command-line criteria into a filter set (only given criteria apply)
pub fn build_filters(args: &ListArgs) -> PkgcatResult<Vec<Filter>> {
    let mut filters = Vec::new();

    if !args.names.is_empty() {
        filters.push(if args.glob {
            match_name_globs(&args.names)?
        } else {
            match_name_substrings(&args.names)
        });
    }
    if let Some(ref source) = args.catalog_source {
        filters.push(match_catalog_source(source));
    }
    if let Some(ref text) = args.description {
        filters.push(match_description(text));
    }
    if let Some(ref mode) = args.install_mode {
        filters.push(match_install_mode(mode));
    }
    if !args.keywords.is_empty() {
        filters.push(match_keywords(&args.keywords));
    }
    if let Some(certified) = args.certified {
        filters.push(match_certified(certified));
    }

    Ok(filters)
}

fn print_table(packages: &[PackageManifest]) {
    println!(
        "{:<40} {:<28} {:<12} {:<30}",
        style("NAME").bold(),
        style("CATALOG").bold(),
        style("DEFAULT").bold(),
        style("CHANNELS").bold()
    );
    println!("{}", "-".repeat(110));

    for pkg in packages {
        println!(
            "{:<40} {:<28} {:<12} {:<30}",
            pkg.name(),
            pkg.status.catalog_source,
            pkg.default_channel_name(),
            pkg.channel_names().join(",")
        );
    }

    println!();
    println!("{} package(s)", packages.len());
}

/// Summary row for JSON output
#[derive(Serialize)]
struct PackageSummary<'a> {
    name: &'a str,
    display_name: &'a str,
    catalog_source: &'a str,
    provider: &'a str,
    default_channel: &'a str,
    channels: Vec<&'a str>,
    keywords: &'a [String],
    install_modes: Vec<&'a str>,
}

impl<'a> From<&'a PackageManifest> for PackageSummary<'a> {
    fn from(pkg: &'a PackageManifest) -> Self {
        Self {
            name: pkg.name(),
            display_name: pkg.display_name(),
            catalog_source: &pkg.status.catalog_source,
            provider: &pkg.status.provider.name,
            default_channel: pkg.default_channel_name(),
            channels: pkg.channel_names(),
            keywords: pkg.default_keywords(),
            install_modes: pkg.default_install_modes(),
        }
    }
}

fn print_json(packages: &[PackageManifest]) -> PkgcatResult<()> {
    let summaries: Vec<PackageSummary<'_>> = packages.iter().map(PackageSummary::from).collect();
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}

fn print_plain(packages: &[PackageManifest]) {
    for pkg in packages {
        println!("{}", pkg.name());
    }
}
