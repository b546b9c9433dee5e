#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use soapbox_core::config::load_client_config;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "soapbox: feature voting from the command line",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "List features",
        after_help = "EXAMPLES:\n    # List all features, newest first\n    sbx list\n\n    # Only features you voted for\n    sbx list --mine\n\n    # Machine-readable output\n    sbx list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        about = "Show one feature",
        after_help = "EXAMPLES:\n    # Show feature 7\n    sbx show 7"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        about = "Submit a new feature",
        after_help = "EXAMPLES:\n    # Submit a suggestion\n    sbx create --title \"Dark mode\" --author alice\n\n    # With a description\n    sbx create --title \"Dark mode\" --author alice --description \"Easier on the eyes\""
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        about = "Toggle your vote on a feature",
        after_help = "EXAMPLES:\n    # Upvote feature 7 (or retract your vote if already cast)\n    sbx vote 7"
    )]
    Vote(cmd::vote::VoteArgs),

    #[command(
        about = "Delete a feature",
        after_help = "EXAMPLES:\n    # Delete feature 7\n    sbx delete 7"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        about = "Show your recorded votes",
        after_help = "EXAMPLES:\n    # Locally recorded votes\n    sbx votes\n\n    # What the server attributes to you\n    sbx votes --remote"
    )]
    Votes(cmd::votes::VotesArgs),

    #[command(about = "Check that the API is reachable")]
    Health,

    #[command(about = "Print your anonymous user id")]
    Whoami,

    #[command(about = "Clear the local user id and vote set")]
    Reset,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("SOAPBOX_LOG").unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_client_config()?;
    tracing::debug!(base_url = %config.base_url, "loaded client configuration");
    let output = cli.output_mode();

    match &cli.command {
        Commands::List(args) => cmd::list::run_list(args, &config, output),
        Commands::Show(args) => cmd::show::run_show(args, &config, output),
        Commands::Create(args) => cmd::create::run_create(args, &config, output),
        Commands::Vote(args) => cmd::vote::run_vote(args, &config, output),
        Commands::Delete(args) => cmd::delete::run_delete(args, &config, output),
        Commands::Votes(args) => cmd::votes::run_votes(args, &config, output),
        Commands::Health => cmd::health::run_health(&config, output),
        Commands::Whoami => cmd::user::run_whoami(output),
        Commands::Reset => cmd::user::run_reset(output),
    }
}
