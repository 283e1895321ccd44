//! layer-export - export the visible layers of a layered document as sprites.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use exporter::{ExportSettings, Exporter, MalformedGroupPolicy, PivotPos};
use media::ScaleBy;

/// Export the visible layers of a layered document as sprites
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Document manifest (JSON)
    manifest: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Downscale divisor: 1, 2 or 4
    #[arg(long)]
    scale: Option<u32>,

    /// Sprite pivot, e.g. center, top-left, bottom
    #[arg(long)]
    pivot: Option<String>,

    /// Pixels per world unit
    #[arg(long)]
    pixels_per_unit: Option<f32>,

    /// Settings file (JSON); flags override its values
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Export without groups when group markers do not match up
    #[arg(long)]
    flatten_malformed: bool,

    /// Stop at the first layer that fails
    #[arg(long)]
    fail_fast: bool,

    /// Print the layer outline before exporting
    #[arg(long)]
    dump_groups: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn build_settings(args: &Args) -> Result<ExportSettings> {
    let mut settings = match &args.settings {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading settings {}", path.display()))?;
            ExportSettings::from_json(&json)?
        }
        None => ExportSettings::default(),
    };

    if let Some(divisor) = args.scale {
        let scale = ScaleBy::from_divisor(divisor)
            .ok_or_else(|| anyhow!("unsupported scale {divisor}, expected 1, 2 or 4"))?;
        settings = settings.with_scale(scale);
    }
    if let Some(name) = &args.pivot {
        let pivot = PivotPos::from_name(name).ok_or_else(|| anyhow!("unknown pivot '{name}'"))?;
        settings = settings.with_pivot(pivot);
    }
    if let Some(ppu) = args.pixels_per_unit {
        settings = settings.with_pixels_per_unit(ppu);
    }
    if args.flatten_malformed {
        settings = settings.with_malformed_groups(MalformedGroupPolicy::Flatten);
    }
    if args.fail_fast {
        settings = settings.with_fail_fast(true);
    }

    Ok(settings)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("layer-export v{}", exporter::VERSION);

    let settings = build_settings(&args)?;
    let document = exporter::load_document(&args.manifest)
        .with_context(|| format!("loading {}", args.manifest.display()))?;

    let exporter = Exporter::new(settings);
    let report = exporter.export(&document)?;

    if args.dump_groups {
        println!("Layers:");
        print!("{}", exporter::outline(&document, &report.groups));
    }

    exporter::write_assets(&report, exporter.settings(), &args.out)?;

    for failure in &report.failures {
        warn!("Not exported: layer {} '{}': {}", failure.index, failure.name, failure.error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "layer-export",
            "doc.json",
            "--scale",
            "2",
            "--pivot",
            "bottom-left",
            "--flatten-malformed",
        ]);
        let settings = build_settings(&args).unwrap();

        assert_eq!(settings.scale_by, ScaleBy::X2);
        assert_eq!(settings.pivot, PivotPos::BottomLeft);
        assert_eq!(settings.on_malformed_groups, MalformedGroupPolicy::Flatten);
        assert!(!settings.fail_fast);
    }

    #[test]
    fn test_bad_scale_rejected() {
        let args = Args::parse_from(["layer-export", "doc.json", "--scale", "3"]);
        assert!(build_settings(&args).is_err());
    }
}
