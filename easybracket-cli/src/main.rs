mod bracket;
mod play;
mod predict;
mod teams;
mod utils;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use easybracket_app::{logger, Config};
use log::LevelFilter;

#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Args {
    /// Path to a TOML config file.
    #[clap(short, long)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the bracket generated for the teams in a JSON file.
    Bracket(bracket::Command),
    /// Predict the outcome of a match from the records of both teams.
    Predict(predict::Command),
    /// Run a tournament interactively.
    Play(play::Command),
}

fn main() {
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = Config::load(args.config.as_ref())?;
    init_logger(config.loglevel)?;

    log::debug!("Using config: {:?}", config);

    match args.command {
        Command::Bracket(command) => command.run(&config),
        Command::Predict(command) => command.run(&config),
        Command::Play(command) => command.run(&config),
    }
}

fn init_logger(level: LevelFilter) -> Result<(), Box<dyn Error>> {
    logger::init(level).map_err(|err| err.to_string())?;
    Ok(())
}
