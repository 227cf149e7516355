// deckdiff CLI - find new cards in a board export, keep a master of all seen cards

mod exit_codes;
mod job;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use job::JobArgs;

#[derive(Parser)]
#[command(name = "deckdiff")]
#[command(about = "Reconcile a board export against a master record of every card seen so far")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a category, write the new cards to a timestamped CSV, update the master
    #[command(after_help = "\
The artifact is written to <output_location>/<MMDDYYYYHHMMSS><category>.csv
with one `name,description` row per new card and no header. It is written
even when there are no new cards.

Examples:
  deckdiff run
  deckdiff run --config conf/deckdiff.toml
  deckdiff run --category Words --input-name board-2026-10-18
  deckdiff run --dry-run --json")]
    Run {
        #[command(flatten)]
        job: JobArgs,

        /// Print the run report as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Reconcile and report, but write neither artifact nor master
        #[arg(long)]
        dry_run: bool,
    },

    /// Check the config and print the resolved file locations
    Validate {
        #[command(flatten)]
        job: JobArgs,
    },

    /// List the categories of a board export with their card counts
    #[command(after_help = "\
Examples:
  deckdiff categories data/input/board.json
  deckdiff categories data/input/board.json --json")]
    Categories {
        /// Board export (JSON)
        input: PathBuf,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write a starter config file
    Init {
        /// Where to write it
        #[arg(default_value = "deckdiff.toml")]
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: deckdiff <command> [options]");
            eprintln!("       deckdiff --help for more information");
            Err(CliError::args(""))
        }
        Some(Commands::Run { job, json, dry_run }) => job::cmd_run(job, json, dry_run),
        Some(Commands::Validate { job }) => job::cmd_validate(job),
        Some(Commands::Categories { input, json }) => job::cmd_categories(input, json),
        Some(Commands::Init { path }) => job::cmd_init(path),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
