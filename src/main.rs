mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cli::decode::cmd_decode;
use cli::encode::cmd_encode;
use cli::resolve::cmd_resolve;

#[derive(Parser)]
#[command(
    name = "goquiche",
    version,
    about = "Bake a Go program into one Gödel number, and factor it back"
)]
struct Cli {
    /// Log symbol assignment and other debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a Go source file into its program number
    Encode {
        /// Input .go file
        input: PathBuf,
        /// Snapshot output (default: <input>.symbols.json, or [output] snapshot_dir)
        #[arg(long, value_name = "PATH")]
        snapshot: Option<PathBuf>,
        /// Encode top-level declarations in parallel
        #[arg(long)]
        parallel: bool,
        /// Do not print the symbol table
        #[arg(short, long)]
        quiet: bool,
    },
    /// Factor a program number back into its symbols
    Decode {
        /// The number, or `-` to read it from stdin
        number: String,
        /// Registry snapshot written by `encode`
        #[arg(long, value_name = "PATH")]
        snapshot: PathBuf,
        /// Also print how often each symbol occurs
        #[arg(long)]
        occurrences: bool,
    },
    /// Look up (or assign) registry entries for symbols
    Resolve {
        /// Symbols to resolve
        #[arg(required = true)]
        symbols: Vec<String>,
        /// Snapshot to resolve against; grown entries are written back
        #[arg(long, value_name = "PATH")]
        snapshot: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "goquiche=debug" } else { "goquiche=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Encode {
            input,
            snapshot,
            parallel,
            quiet,
        } => cmd_encode(input, snapshot, parallel, quiet),
        Command::Decode {
            number,
            snapshot,
            occurrences,
        } => cmd_decode(number, snapshot, occurrences),
        Command::Resolve { symbols, snapshot } => cmd_resolve(symbols, snapshot),
    }
}
