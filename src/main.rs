use clap::Parser;
use freight_consist::consist::Train;
use freight_consist::roster::Roster;
use freight_consist::shell::Shell;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Interactive editor for a freight train consist")]
struct Args {
    /// TOML file describing the starting consist
    #[arg(long)]
    roster: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let train = match &args.roster {
        Some(path) => match Roster::load_from_file(path).and_then(|roster| roster.build()) {
            Ok(train) => {
                info!(cars = train.size(), "loaded starting consist from {}", path.display());
                train
            }
            Err(err) => {
                error!("could not load roster {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => Train::new(),
    };

    let stdin = io::stdin();
    let mut shell = Shell::new(train, stdin.lock(), io::stdout());
    if let Err(err) = shell.run() {
        error!("shell terminated: {err}");
        return ExitCode::FAILURE;
    }
    info!("session ended");
    ExitCode::SUCCESS
}
