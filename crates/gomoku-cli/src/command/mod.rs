use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

use self::{init_config::InitConfigArg, play::PlayArg, train::TrainArg};

mod init_config;
mod play;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Configuration file (TOML); defaults are used when it does not exist
    #[arg(long, global = true, default_value = "gomoku.toml")]
    config: PathBuf,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train the network by self-play
    Train(#[clap(flatten)] TrainArg),
    /// Play a game with a trained network, against itself or a human
    Play(#[clap(flatten)] PlayArg),
    /// Print the default configuration
    InitConfig(#[clap(flatten)] InitConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match &args.mode {
        Mode::Train(arg) => train::run(&AppConfig::load_or_default(&args.config)?, arg)?,
        Mode::Play(arg) => play::run(arg)?,
        Mode::InitConfig(arg) => init_config::run(arg)?,
    }
    Ok(())
}
