//! git-submit - land a reviewed branch on mainline
//!
//! CLI binary; run as `git submit` once it is on `PATH`.

use anstream::eprintln;
use clap::Parser;
use git_submit::types::Invocation;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::style::Stylize;

#[derive(Parser)]
#[command(name = "git-submit")]
#[command(about = "Land a reviewed branch on mainline as a single rebased commit")]
#[command(version)]
struct Cli {
    /// Branch to submit (defaults to the checked-out branch)
    branch: Option<String>,

    /// Submit even if CI has not reported success
    #[arg(short, long)]
    force: bool,

    /// Path to the git repository (defaults to current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "git_submit=info",
        _ => "git_submit=debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let path = cli.path.unwrap_or_else(|| PathBuf::from("."));
    let invocation = Invocation {
        branch: cli.branch,
        force: cli.force,
    };

    match cli::run_submit(&path, &invocation).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err}", "error".error());
            ExitCode::from(err.exit_code())
        }
    }
}
