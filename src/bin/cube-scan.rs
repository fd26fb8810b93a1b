//! Command-line interface for cube_scan
//!
//! Reads one frame image and the polygon candidates extracted from it, and
//! prints the detected face grid as JSON (`null` when no face was found).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cube_scan::frame::{load_frame, load_polygons};
use cube_scan::{FaceDetector, ScanConfig};

#[derive(Debug, Parser)]
#[command(name = "cube-scan", version, about = "Detect the sticker colors of one Rubik's Cube face")]
struct Args {
    /// Frame image file
    #[arg(long, required_unless_present = "dump_config")]
    image: Option<PathBuf>,

    /// JSON file with the frame's polygon candidates
    #[arg(long, required_unless_present = "dump_config")]
    polygons: Option<PathBuf>,

    /// JSON configuration file (defaults apply to missing fields)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> cube_scan::Result<()> {
    let config = match &args.config {
        Some(path) => ScanConfig::from_json_file(path)?,
        None => ScanConfig::default(),
    };

    if args.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let (Some(image_path), Some(polygons_path)) = (&args.image, &args.polygons) else {
        return Err(cube_scan::ScanError::invalid_parameter(
            "--image/--polygons",
            "missing",
        ));
    };

    let detector = FaceDetector::new(&config)?;
    let frame = load_frame(image_path)?;
    let polygons = load_polygons(polygons_path)?;
    info!(
        width = frame.width(),
        height = frame.height(),
        polygons = polygons.len(),
        "frame loaded"
    );

    let grid = detector.detect(&frame, &polygons)?;
    match &grid {
        Some(grid) => info!(colors = ?grid.colors(), "face detected"),
        None => info!("no face detected"),
    }

    let json = serde_json::to_string_pretty(&grid)
        .map_err(|e| cube_scan::ScanError::config("Failed to serialize grid", e))?;
    println!("{}", json);
    Ok(())
}
