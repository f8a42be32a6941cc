//! cmerge: merge offline training databases into one combined database.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cmerge")]
#[command(about = "Merge offline training databases into one combined database")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    merge: MergeArgs,

    /// Log per-source details to stderr (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,
}

#[derive(Args, Clone)]
struct MergeArgs {
    /// File listing source DBs, one per line (# starts a comment)
    #[arg(long = "list")]
    list: Option<PathBuf>,

    /// Combined output DB
    #[arg(long = "out")]
    out: Option<PathBuf>,

    /// TOML config file (default: ./cmerge.toml if present)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Remove an existing output DB before merging
    #[arg(long = "fresh")]
    fresh: bool,

    /// Output format: table, json
    #[arg(short = 'f', long = "format", default_value = "table")]
    format: String,

    /// Suppress progress output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge every DB in the list into the output DB (default)
    Merge(MergeArgs),

    /// Sum match counts and durations across training DBs
    Minutes {
        /// Extra DB paths to include
        paths: Vec<PathBuf>,

        /// File listing source DBs (default from config)
        #[arg(long = "list")]
        list: Option<PathBuf>,

        /// Only summarize the given paths, not the list file
        #[arg(long = "no-list", conflicts_with = "list")]
        no_list: bool,

        /// TOML config file
        #[arg(long = "config")]
        config: Option<PathBuf>,

        /// Output format: table, json
        #[arg(short = 'f', long = "format", default_value = "table")]
        format: String,
    },

    /// Create an empty combined DB with the training schema
    Init {
        /// Output DB to create
        #[arg(long = "out")]
        out: Option<PathBuf>,

        /// TOML config file
        #[arg(long = "config")]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => commands::merge(&cli.merge.into()),
        Some(Commands::Merge(args)) => commands::merge(&args.into()),
        Some(Commands::Minutes { paths, list, no_list, config, format }) => {
            commands::minutes(&paths, list.as_deref(), no_list, config.as_deref(), &format)
        }
        Some(Commands::Init { out, config }) => commands::init(out.as_deref(), config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

impl From<MergeArgs> for commands::MergeOptions {
    fn from(args: MergeArgs) -> Self {
        Self {
            list: args.list,
            out: args.out,
            config: args.config,
            fresh: args.fresh,
            format: args.format,
            quiet: args.quiet,
        }
    }
}
