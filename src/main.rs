//! plantid-labels: design and print plant sample labels from CSV metadata.
//!
//! Every CSV row becomes one label carrying a QR code, selected metadata
//! fields and an optional highlighted value. Labels are exported as a
//! printable PDF sheet or previewed in a terminal dashboard.

mod app;
mod cli;
mod data;
mod design;
mod error;
mod logging;
mod render;
mod ui;

use std::path::Path;

use anyhow::{Context, Result};
use cli::{AppConfig, Cli, Commands, DesignArgs, InputArgs};
use logging::LogTarget;
use tracing::info;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Generate {
            input,
            output,
            design,
            sheet,
        } => {
            logging::init(LogTarget::Stderr, "info")?;
            let dataset = load(&input)?;
            let design = design.resolve(&dataset.columns)?;
            let bytes = render::render_sheet(&dataset, &design, sheet.options()?)?;
            write_pdf(&output, &bytes)?;
            println!("Wrote {} labels to {}", dataset.len(), output.display());
        }
        Commands::Label {
            input,
            row,
            output,
            design,
        } => {
            logging::init(LogTarget::Stderr, "info")?;
            let dataset = load(&input)?;
            let design = design.resolve(&dataset.columns)?;
            let bytes = render::render_single(dataset.record(row)?, &design)?;
            write_pdf(&output, &bytes)?;
            println!("Wrote label for row {row} to {}", output.display());
        }
        Commands::Preview {
            input,
            output,
            interval,
            design,
            sheet,
        } => {
            logging::init(LogTarget::preview_file(), "info")?;
            let config = AppConfig::from_preview_command(input, output, interval, design, sheet)?;

            // Run the TUI application
            app::run(config)?;
        }
        Commands::Presets => {
            print_presets();
        }
        Commands::Inspect { input, json } => {
            logging::init(LogTarget::Stderr, "warn")?;
            let summary = load(&input)?.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{summary}");
            }
        }
    }

    Ok(())
}

fn load(input: &InputArgs) -> Result<data::Dataset> {
    data::load_csv(&input.csv, input.csv_options()?)
        .with_context(|| format!("Failed to load CSV: {:?}", input.csv))
}

fn write_pdf(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {parent:?}"))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("Failed to write PDF: {path:?}"))?;
    info!(path = %path.display(), bytes = bytes.len(), "Wrote PDF");
    Ok(())
}

fn print_presets() {
    let default_design = DesignArgs::default();
    let current = default_design
        .design_path()
        .and_then(|p| design::LabelDesign::load(&p).ok())
        .map(|d| d.preset)
        .unwrap_or_else(|| design::DEFAULT_PRESET.to_string());

    for preset in design::PRESETS {
        let marker = if preset.key == current { "*" } else { " " };
        println!(
            "{marker} {:<16} {:<22} {}",
            preset.key,
            preset.name,
            preset.size_text()
        );
    }
    println!("  {:<16} {:<22} any size from 5 to 140 mm (--width/--height)", design::CUSTOM_PRESET, "Custom");
}
