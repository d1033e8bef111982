mod cli;
mod renamer;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = cli::Cli::parse();

    let default_level = if cli.verbose { "ytmusic_dl=debug" } else { "ytmusic_dl=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
