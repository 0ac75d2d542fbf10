mod script;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use wineglass_base::DEFAULT_BUBBLE_DISTANCE;
use wineglass_geometry::HexGrid;

use crate::script::{Session, layout_config, load_script};

#[derive(Parser)]
#[command(name = "wineglass")]
#[command(about = "Headless driver for the WineGlass bubble layout")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Spiral(SpiralArgs),
    Simulate(SimulateArgs),
}

#[derive(Args)]
struct SpiralArgs {
    #[arg(long)]
    count: usize,
    #[arg(long, default_value_t = DEFAULT_BUBBLE_DISTANCE)]
    distance: f64,
}

#[derive(Args)]
struct SimulateArgs {
    #[arg(long)]
    items: usize,
    #[arg(long)]
    width: f64,
    #[arg(long)]
    height: f64,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, conflicts_with = "config")]
    bubble_size: Option<f64>,
    #[arg(long)]
    script: Option<PathBuf>,
    #[arg(long)]
    frames: Option<usize>,
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Spiral(args) => spiral(args),
        Command::Simulate(args) => simulate(args),
    }
}

fn spiral(args: SpiralArgs) -> Result<()> {
    if !(args.distance.is_finite() && args.distance > 0.0) {
        bail!("--distance must be a positive number, got {}", args.distance);
    }
    let coords = HexGrid::with_spacing(args.distance).coords(args.count);
    println!("{}", serde_json::to_string_pretty(&coords)?);
    Ok(())
}

fn simulate(args: SimulateArgs) -> Result<()> {
    let config = layout_config(args.config.as_deref(), args.bubble_size)?;
    if !(args.width > 0.0 && args.height > 0.0) {
        bail!("--width and --height must be positive");
    }
    if !(args.fps.is_finite() && args.fps > 0.0) {
        bail!("--fps must be a positive number, got {}", args.fps);
    }
    let steps = match &args.script {
        Some(path) => load_script(path)
            .with_context(|| format!("failed to load script {}", path.display()))?,
        None => Vec::new(),
    };

    let mut session = Session::new(args.items, config, args.width, args.height, steps);
    let frames = session.run(1.0 / args.fps, args.frames);
    info!(frames, items = args.items, "simulation complete");

    let report = session.report();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
