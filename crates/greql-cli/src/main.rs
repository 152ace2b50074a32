//! GReQL CLI - run regular path searches over JSON graphs.
//!
//! Loads a graph and an automaton from JSON files and runs one of the
//! searches on them: reachability, path verification, reachable sets,
//! path systems and slices.

mod commands;
mod input;
mod output;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Regular path expression search tool.
///
/// Every search reads a graph file and an automaton file; vertices and
/// edges are referred to by the names used in the graph file.
#[derive(Parser)]
#[command(name = "greql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Suppress output and log messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Output format options.
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table format (default for TTY)
    #[default]
    Table,
    /// Machine-readable JSON format
    Json,
}

/// Inputs and limits shared by every search.
#[derive(Args)]
struct SearchArgs {
    /// Graph file (JSON)
    #[arg(long, short)]
    graph: PathBuf,

    /// Automaton file (JSON)
    #[arg(long, short)]
    automaton: PathBuf,

    /// Abort when more (vertex, state) pairs are queued
    #[arg(long)]
    max_queue: Option<usize>,

    /// Abort when more (vertex, state) pairs are visited
    #[arg(long)]
    max_markers: Option<usize>,

    /// Abort a search running longer than this
    #[arg(long)]
    timeout_ms: Option<u64>,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Display graph (and automaton) information
    Info {
        /// Graph file (JSON)
        #[arg(long, short)]
        graph: PathBuf,

        /// Automaton file (JSON)
        #[arg(long, short)]
        automaton: Option<PathBuf>,
    },

    /// Test whether an accepted path leads from one vertex to another
    Reach {
        #[command(flatten)]
        search: SearchArgs,

        /// Start vertex
        #[arg(long)]
        from: String,

        /// Target vertex
        #[arg(long)]
        to: String,
    },

    /// Test whether the automaton accepts a path
    Matches {
        #[command(flatten)]
        search: SearchArgs,

        /// Alternating vertex and edge names, e.g. `a,e1,b,e2,c`
        #[arg(long, value_delimiter = ',', required = true)]
        path: Vec<String>,
    },

    /// List the vertices at the end of an accepted path
    Reachable {
        #[command(flatten)]
        search: SearchArgs,

        /// Start vertex (repeatable)
        #[arg(long, required = true)]
        from: Vec<String>,
    },

    /// Build the path system rooted at a vertex
    PathSystem {
        #[command(flatten)]
        search: SearchArgs,

        /// Root vertex
        #[arg(long)]
        from: String,

        /// Also print one path to every leaf
        #[arg(long)]
        paths: bool,
    },

    /// Build the slice rooted at a set of vertices
    Slice {
        #[command(flatten)]
        search: SearchArgs,

        /// Root vertex (repeatable)
        #[arg(long, required = true)]
        from: Vec<String>,

        /// Also print every path to this vertex
        #[arg(long)]
        paths_to: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else if !cli.quiet {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match &cli.command {
        Commands::Info { graph, automaton } => {
            commands::info::run(graph, automaton.as_deref(), cli.format, cli.quiet)
        }
        Commands::Reach { search, from, to } => commands::reach::run(search, from, to, cli.format, cli.quiet),
        Commands::Matches { search, path } => commands::matches::run(search, path, cli.format, cli.quiet),
        Commands::Reachable { search, from } => commands::reachable::run(search, from, cli.format, cli.quiet),
        Commands::PathSystem { search, from, paths } => {
            commands::path_system::run(search, from, *paths, cli.format, cli.quiet)
        }
        Commands::Slice {
            search,
            from,
            paths_to,
        } => commands::slice::run(search, from, paths_to.as_deref(), cli.format, cli.quiet),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
