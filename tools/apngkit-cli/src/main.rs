//! apngkit CLI: inspect, render, scrub, and play animated PNGs.
//!
//! Usage:
//!   apngkit info <PATH>                    Show canvas and frame metadata
//!   apngkit render <PATH> -f N -o OUT      Render one frame to a PNG
//!   apngkit scrub <PATH> --frames 5,2,40   Render frames in order
//!   apngkit play <PATH> [--seconds S]      Headless real-time playback
//!   apngkit config [--init]                Show or write the config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use apngkit_common::config::AppConfig;
use apngkit_common::logging::{init_logging, logging_for_verbosity};

mod commands;
mod source;

#[derive(Parser)]
#[command(
    name = "apngkit",
    about = "Frame-accurate APNG compositing and playback",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show canvas size, frame count, and per-frame metadata
    Info {
        /// Path to the APNG file
        path: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a single frame to an image file
    Render {
        /// Path to the APNG file
        path: PathBuf,

        /// Zero-based frame index (clamped to the last frame)
        #[arg(short, long, default_value = "0")]
        frame: usize,

        /// Output image path
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,
    },

    /// Render a sequence of frame indices in order, reporting each seek path
    Scrub {
        /// Path to the APNG file
        path: PathBuf,

        /// Comma-separated zero-based frame indices
        #[arg(long, value_delimiter = ',', required = true)]
        frames: Vec<usize>,

        /// Directory to write each rendered frame into
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Play the animation in real time without a display
    Play {
        /// Path to the APNG file
        path: PathBuf,

        /// Speed multiplier (defaults to the configured speed)
        #[arg(long)]
        speed: Option<f64>,

        /// How long to play, in seconds
        #[arg(long, default_value = "3.0")]
        seconds: f64,

        /// Scheduler tick rate in Hz (defaults to the configured rate)
        #[arg(long)]
        fps: Option<u32>,

        /// Save the frame showing when playback stops
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the configuration, or write the defaults with --init
    Config {
        /// Write the current configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load();
    init_logging(&logging_for_verbosity(&config.logging, cli.verbose));

    match cli.command {
        Commands::Info { path, json } => commands::info::run(path, json),
        Commands::Render {
            path,
            frame,
            output,
        } => commands::render::run(path, frame, output).await,
        Commands::Scrub {
            path,
            frames,
            output_dir,
        } => commands::scrub::run(path, frames, output_dir).await,
        Commands::Play {
            path,
            speed,
            seconds,
            fps,
            output,
        } => {
            let options = commands::play::PlayOptions {
                speed,
                seconds,
                fps,
                output,
            };
            commands::play::run(path, options, config.playback).await
        }
        Commands::Config { init } => commands::config::run(&config, init),
    }
}
