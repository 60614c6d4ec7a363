use clap::{Parser, Subcommand};
use std::process;
use tracing::error;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score and rank a player roster
    Rank(cmd::rank::RankArgs),
    /// List the built-in weight presets
    Presets,
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let result = match cli.command {
        Commands::Rank(args) => cmd::rank::run(args),
        Commands::Presets => cmd::presets::run(),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
