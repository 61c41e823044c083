use anyhow::Result;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ArgAction, Parser, Subcommand};
use gvt_core::Engine;
use std::path::PathBuf;
use tracing::Level;

mod commands;

use commands::{add, checkout, commit, detach, history, init, version, Report};

const VERBS: [&str; 7] = [
    "init", "add", "detach", "commit", "checkout", "history", "version",
];

#[derive(Parser)]
#[command(name = "gvt")]
#[command(version, about = "Generation-based file versioning", long_about = None)]
struct Cli {
    /// Working directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    work_dir: Option<PathBuf>,

    /// Log more details to stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a repository in the working directory
    Init,

    /// Start tracking a file
    Add {
        /// File to add
        file: Option<PathBuf>,

        /// Message for the new generation
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Stop tracking a file
    Detach {
        /// File to detach
        file: Option<PathBuf>,

        /// Message for the new generation
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Record the current content of a tracked file
    Commit {
        /// File to commit
        file: Option<PathBuf>,

        /// Message for the new generation
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Restore the working directory to a generation
    Checkout {
        /// Generation number
        #[arg(allow_negative_numbers = true)]
        generation: Option<String>,
    },

    /// Show generation summaries, most recent first
    History {
        /// Number of generations to show
        #[arg(long, allow_hyphen_values = true)]
        last: Option<String>,
    },

    /// Show the full message of a generation (defaults to the active one)
    Version {
        /// Generation number
        #[arg(allow_negative_numbers = true)]
        generation: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse_from(normalize_args(std::env::args())) {
        Ok(cli) => cli,
        Err(err) if err.kind() == ErrorKind::InvalidSubcommand => {
            let name = match err.get(ContextKind::InvalidSubcommand) {
                Some(ContextValue::String(name)) => name.clone(),
                _ => String::new(),
            };
            exit(Report::unknown_command(&name));
        }
        Err(err) => err.exit(),
    };

    init_tracing(cli.verbose);

    let engine = Engine::new(commands::get_work_dir(cli.work_dir)?);
    exit(dispatch(&engine, cli.command));
}

fn dispatch(engine: &Engine, command: Option<Commands>) -> Report {
    let Some(command) = command else {
        return Report::no_command();
    };

    match command {
        Commands::Init => init::run(engine),
        Commands::Add { file, message } => add::run(engine, file, message),
        Commands::Detach { file, message } => detach::run(engine, file, message),
        Commands::Commit { file, message } => commit::run(engine, file, message),
        Commands::Checkout { generation } => checkout::run(engine, generation),
        Commands::History { last } => history::run(engine, last),
        Commands::Version { generation } => version::run(engine, generation),
    }
}

fn exit(report: Report) -> ! {
    report.print();
    std::process::exit(report.code)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// Accepts the legacy spellings: case-insensitive verbs and `-last`.
fn normalize_args<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    let mut out = Vec::new();
    let mut verb_seen = false;
    let mut expects_value = false;

    for (i, arg) in args.into_iter().enumerate() {
        if i == 0 {
            out.push(arg);
            continue;
        }
        if arg == "-last" {
            out.push("--last".to_string());
            continue;
        }
        if !verb_seen && !expects_value && !arg.starts_with('-') {
            verb_seen = true;
            let lower = arg.to_lowercase();
            if VERBS.contains(&lower.as_str()) {
                out.push(lower);
                continue;
            }
        }
        expects_value = !verb_seen && matches!(arg.as_str(), "-C" | "--work-dir");
        out.push(arg);
    }

    out
}
