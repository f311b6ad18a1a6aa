//! texpipe - Batch processing of arXiv paper sources
//!
//! Runs pipeline commands (bibitem extraction, page rastering, symbol
//! matching) over per-paper directories under a shared data directory.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use texpipe_core::{ProgressContext, SharedProgress};
use texpipe_store::DataDir;

mod cmd;
mod config;
mod registry;

use config::Config;
use registry::Settings;

#[derive(Parser)]
#[command(name = "texpipe")]
#[command(about = "Batch processing of arXiv paper sources")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./texpipe.toml or ~/.config/texpipe/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory holding the stage directories
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a pipeline command over a set of papers
    Run(cmd::run::RunArgs),
    /// List available pipeline commands
    Commands,
    /// List stage directories with paper counts
    Stages(cmd::stages::StagesArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress: SharedProgress = Arc::new(ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug, the spinner shows activity
    //   non-TTY: info unless --debug, logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = is_tty && !cli.debug;
    texpipe_core::init_logging(quiet, cli.debug, multi)?;

    let config = if let Some(path) = &cli.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.dir.clone());
    let settings = Settings {
        data: DataDir::new(&data_dir),
        dpi: config.raster.dpi,
    };

    match cli.command {
        Command::Run(args) => cmd::run::run(args, &settings, &progress),
        Command::Commands => {
            cmd::commands::run(&settings);
            Ok(())
        }
        Command::Stages(args) => {
            let data = args.dir.map_or(settings.data, DataDir::new);
            cmd::stages::run(&data)
        }
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec!["Data directory", &data_dir.display().to_string()]);
            table.add_row(vec!["Raster DPI", &config.raster.dpi.to_string()]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
