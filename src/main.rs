use anyhow::{Context, Result};
use arcade_snake::game::GameConfig;
use arcade_snake::modes::HumanMode;
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "arcade_snake")]
#[command(version, about = "Snake with particle bursts and smooth movement")]
struct Cli {
    /// JSON file overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for food placement and particles (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is used by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to initialize logger")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    log::info!("starting with config: {:?}", config);

    let mut human_mode = HumanMode::new(config, cli.seed);
    human_mode.run().await?;

    Ok(())
}
