use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use mapcenter::config::{FileConfig, Overrides, RunConfig};
use mapcenter::dataset::{read_entities, write_entities};
use mapcenter::pipeline::{self, RunReport};

/// Attach center points and display names to a JSON dataset of SVG outlines
///
/// Examples:
///   # Compute centers for grouped_country_paths.json
///   mapcenter
///
///   # Explicit files, also add a `names` list copied from `class`
///   mapcenter -i countries.json -o countries_out.json --names
///
///   # Only add names
///   mapcenter --names --no-centers
#[derive(Parser, Debug)]
#[command(name = "mapcenter")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches mapcenter.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input JSON file (defaults to grouped_country_paths.json)
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Output JSON file (defaults to updated_grouped_country_paths.json)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Add a `names` list holding each entity's `class`
    #[arg(long)]
    names: bool,

    /// Do not compute `center` points
    #[arg(long)]
    no_centers: bool,

    /// Spaces of indentation in the output JSON
    #[arg(long)]
    indent: Option<usize>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = match args.config {
        Some(ref config_path) => Some(FileConfig::from_path(config_path)?),
        None => FileConfig::load(),
    };

    let config = RunConfig::resolve(
        Overrides {
            input: args.input,
            output: args.output,
            names: args.names,
            no_centers: args.no_centers,
            indent: args.indent,
            verbose: args.verbose,
        },
        file_config,
    )?;

    init_logger(config.verbose);

    log::debug!("Configuration: {:?}", config);

    let spinner = create_spinner("Reading dataset...");
    let start = Instant::now();
    let mut entities = read_entities(&config.input).context("Failed to load input dataset")?;
    spinner.finish_with_message(format!(
        "Read {} entities from {} [{:.1}s]",
        entities.len(),
        config.input.display(),
        start.elapsed().as_secs_f32()
    ));

    let report = pipeline::run(&mut entities, &config.options);

    let spinner = create_spinner("Writing dataset...");
    let start = Instant::now();
    write_entities(&config.output, &entities, config.indent)
        .context("Failed to write output dataset")?;
    spinner.finish_with_message(format!(
        "Wrote {} [{:.1}s]",
        config.output.display(),
        start.elapsed().as_secs_f32()
    ));

    println!();
    print_summary(&report);
    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn print_summary(report: &RunReport) {
    println!("Entities: {}", report.entities);

    if let Some(centers) = report.centers {
        println!("Centers:");
        println!("  From largest outline: {}", centers.from_polygon);
        println!("  Fallback (degenerate outlines): {}", centers.fallback);
        println!("  Default (no paths): {}", centers.defaulted);
        if centers.non_finite > 0 {
            println!("  Default (coordinate overflow): {}", centers.non_finite);
        }
    }

    if let Some(names) = report.names {
        println!("Names:");
        println!("  Added: {}", names.named);
        if names.skipped > 0 {
            println!("  Skipped (no class): {}", names.skipped);
        }
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
