//! The `mutuals` command line: argument parsing, logging setup and command handlers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

use crate::{builder, capture, gexf, mst, rank, record};

#[derive(Debug, Parser)]
#[command(
    name = "mutuals",
    version,
    about = "Follower graph analysis: closest connections and minimum spanning trees"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Log more (-v for progress, -vv for debugging)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a HAR capture and store the user's followers in the adjacency record
    Extract {
        /// User the capture was recorded for
        #[arg(long)]
        username: String,
        /// Path to the .har file
        #[arg(long, value_name = "FILE")]
        har_path: PathBuf,
        /// Adjacency record to update
        #[arg(long, value_name = "FILE", env = "MUTUALS_RECORD", default_value = "adjacency.json")]
        json_path: PathBuf,
    },
    /// Convert the adjacency record into a weighted, undirected GEXF graph
    Build {
        #[arg(long, value_name = "FILE", env = "MUTUALS_RECORD", default_value = "adjacency.json")]
        input_json: PathBuf,
        #[arg(long, value_name = "FILE", env = "MUTUALS_GRAPH", default_value = "graph.gexf")]
        output_gexf: PathBuf,
    },
    /// List a user's closest connections by mutual followers
    #[command(alias = "rank-connections")]
    BestFriends {
        /// User to analyse
        #[arg(long)]
        username: String,
        #[arg(long, value_name = "FILE", env = "MUTUALS_RECORD", default_value = "adjacency.json")]
        input_json: PathBuf,
        /// How many connections to list, zero or less lists none
        #[arg(long, default_value_t = rank::DEFAULT_TOP_N as i64, allow_negative_numbers = true)]
        top: i64,
    },
    /// Compute a minimum spanning tree of the graph with Prim's algorithm
    Mst {
        /// Node to grow the tree from
        #[arg(long)]
        root: String,
        #[arg(long, value_name = "FILE", env = "MUTUALS_GRAPH", default_value = "graph.gexf")]
        input_gexf: PathBuf,
        #[arg(long, value_name = "FILE", env = "MUTUALS_MST", default_value = "mst.gexf")]
        output_gexf: PathBuf,
    },
}

/// Maps the verbosity flags to the most detailed level that gets logged.
pub fn log_level(verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, _) => Level::DEBUG,
    }
}

/// Installs the stderr log subscriber. Warnings and errors are shown by default.
pub fn init_logging(verbose: u8, quiet: bool) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(verbose, quiet))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs a single command to completion.
///
/// # Errors
/// Returns an error if any input is missing or malformed, or if an output can't be written. No
/// output file is created or modified in that case.
pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Extract {
            username,
            har_path,
            json_path,
        } => handle_extract(&username, &har_path, &json_path),
        Commands::Build {
            input_json,
            output_gexf,
        } => handle_build(&input_json, &output_gexf),
        Commands::BestFriends {
            username,
            input_json,
            top,
        } => handle_best_friends(&username, &input_json, top),
        Commands::Mst {
            root,
            input_gexf,
            output_gexf,
        } => handle_mst(&root, &input_gexf, &output_gexf),
    }
}

fn handle_extract(username: &str, har_path: &Path, json_path: &Path) -> Result<()> {
    println!("Processing HAR for {username}...");

    let followers = capture::followers(har_path)?;
    let count = followers.len();
    record::update(json_path, username, followers)
        .with_context(|| format!("failed to update {}", json_path.display()))?;

    println!("Extracted {count} followers. Updated {}", json_path.display());

    Ok(())
}

fn handle_build(input_json: &Path, output_gexf: &Path) -> Result<()> {
    let record = record::AdjacencyRecord::load(input_json)?;
    let graph = builder::build(&record)?;
    gexf::save(&graph, output_gexf)?;

    println!(
        "Graph built: {} nodes, {} edges (density {:.4}).",
        graph.node_count(),
        graph.edge_count(),
        graph.density()
    );
    println!("Saved to {}", output_gexf.display());

    Ok(())
}

fn handle_best_friends(username: &str, input_json: &Path, top: i64) -> Result<()> {
    let record = record::AdjacencyRecord::load(input_json)?;
    let top_n = usize::try_from(top).unwrap_or(0);
    let connections = rank::rank(&record, username, top_n)?;

    println!("Best friends for {username}:");
    if connections.is_empty() {
        println!("  (none)");
    }
    for (position, connection) in connections.iter().enumerate() {
        println!(
            "{}. {} ({} mutuals)",
            position + 1,
            connection.username,
            connection.mutuals
        );
    }

    Ok(())
}

fn handle_mst(root: &str, input_gexf: &Path, output_gexf: &Path) -> Result<()> {
    let graph = gexf::load(input_gexf)?;
    let tree = mst::mst(&graph, root)?;
    gexf::save(&tree, output_gexf)?;

    println!(
        "MST generated with {} nodes, {} edges, total weight {:.4}.",
        tree.node_count(),
        tree.edge_count(),
        tree.total_weight()
    );
    println!("Saved to {}", output_gexf.display());

    Ok(())
}
