//! decolor: command-line decolorizer.
//!
//! Reads an image file (PNG or JPEG), runs the edge-finding pipeline
//! with configurable thresholds and blur, and writes the resulting
//! line drawing as an inverted PNG.
//!
//! # Usage
//!
//! ```text
//! decolor [OPTIONS] <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use decolor_pipeline::{BlurSetting, ChannelReduction, EdgeFinder, FinderConfig};

/// Turn a raster image into an edge line drawing.
#[derive(Parser)]
#[command(name = "decolor", version)]
struct Cli {
    /// Path to the input image (PNG or JPEG).
    image_path: PathBuf,

    /// Strong quantile fraction: the share of edge-candidate pixels
    /// kept as definite edges. Reduce for less noise, increase if
    /// important edges are missing.
    #[arg(long, default_value_t = FinderConfig::DEFAULT_HIGH_FRACTION)]
    high: f32,

    /// Weak quantile fraction: candidates above this share are kept
    /// when they touch a definite edge.
    #[arg(long, default_value_t = FinderConfig::DEFAULT_LOW_FRACTION)]
    low: f32,

    /// Keep grayscale line strength instead of pure black lines.
    #[arg(long)]
    grayscale: bool,

    /// Pre-blur strength (none, normal, extra).
    #[arg(long, value_enum, default_value_t = Blur::Normal)]
    blur: Blur,

    /// Output path. Defaults to `decolorized-<input stem>.png` next to
    /// the input file.
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Pre-blur strength selection.
#[derive(Clone, Copy, ValueEnum)]
enum Blur {
    /// No smoothing before edge detection.
    None,
    /// One Gaussian pass, sigma 1.4.
    Normal,
    /// One stronger Gaussian pass, sigma 2.0.
    Extra,
}

const fn blur_setting(blur: Blur) -> BlurSetting {
    match blur {
        Blur::None => BlurSetting::None,
        Blur::Normal => BlurSetting::Normal,
        Blur::Extra => BlurSetting::Extra,
    }
}

/// Output path: `--output` if given, else `decolorized-<stem>.png`
/// alongside the input.
fn output_path(cli: &Cli) -> PathBuf {
    cli.output.clone().unwrap_or_else(|| {
        let stem = cli
            .image_path
            .file_stem()
            .map_or_else(|| "image".to_string(), |s| s.to_string_lossy().into_owned());
        let name = decolor_export::download_file_name(&stem);
        cli.image_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(name)
    })
}

fn run(cli: &Cli) -> Result<(), String> {
    let bytes = std::fs::read(&cli.image_path)
        .map_err(|e| format!("Could not read {}: {e}", cli.image_path.display()))?;

    let mut finder = EdgeFinder::new();
    finder
        .load_image(&bytes)
        .map_err(|e| format!("Could not load {}: {e}", cli.image_path.display()))?;

    let image = finder.image().ok_or("no image after load")?;
    println!(
        "Loaded {} ({}x{}, {} channels)",
        cli.image_path.display(),
        image.width(),
        image.height(),
        image.channel_count(),
    );

    finder
        .compute_gradients(ChannelReduction::MaxAbs, blur_setting(cli.blur))
        .map_err(|e| e.to_string())?;
    let lines = finder
        .trace_edges(cli.high, cli.low, cli.grayscale)
        .map_err(|e| e.to_string())?;

    println!(
        "Found {} edge pixels of {}",
        lines.edge_count(),
        lines.dimensions().pixel_count(),
    );

    let png = decolor_export::edge_map_to_png(lines).map_err(|e| e.to_string())?;
    let destination = output_path(cli);
    std::fs::write(&destination, png)
        .map_err(|e| format!("Could not write {}: {e}", destination.display()))?;
    println!("Wrote {}", destination.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
