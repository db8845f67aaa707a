//! Command-line entry point for driftfield.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use driftfield::{ExportOptions, FieldConfig};

#[derive(Parser)]
#[command(name = "driftfield")]
#[command(about = "Drifting particle backdrop: live window or PNG frames", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// JSON field configuration; missing keys use defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Fixed random seed for a reproducible field
    #[arg(short, long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a window and animate the field
    Window,

    /// Render frames headlessly to PNG files
    Render {
        /// Physical width in pixels
        #[arg(long, default_value_t = 1280)]
        width: u32,

        /// Physical height in pixels
        #[arg(long, default_value_t = 720)]
        height: u32,

        /// Device pixel ratio
        #[arg(long, default_value_t = 1.0)]
        scale: f64,

        /// Number of frames to write
        #[arg(long, default_value_t = 60)]
        frames: u32,

        /// Simulated milliseconds between frames
        #[arg(long, default_value_t = 1000.0 / 60.0)]
        frame_ms: f32,

        /// Output directory
        #[arg(short, long, default_value = "frames")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still wins when set
    let default_level = match (cli.verbose, cli.quiet) {
        (0, true) => "error",
        (0, false) => "warn",
        (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = match &cli.config {
        Some(path) => FieldConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => FieldConfig::default(),
    };

    match cli.command {
        Commands::Window => {
            driftfield::window::run(config, cli.seed).context("running window")?;
        }
        Commands::Render {
            width,
            height,
            scale,
            frames,
            frame_ms,
            out,
        } => {
            let options = ExportOptions {
                width,
                height,
                scale_factor: scale,
                frames,
                frame_ms,
                seed: cli.seed.unwrap_or(0),
                out_dir: out,
            };
            let written = driftfield::render_frames(&config, &options)
                .context("rendering frames")?;
            println!(
                "wrote {} frames to {}",
                written.len(),
                options.out_dir.display()
            );
        }
    }

    Ok(())
}
