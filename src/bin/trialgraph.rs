//! trialgraph CLI: fetch clinical-trial studies and write graph tuples.
//!
//! Usage:
//!   trialgraph fetch [--config path] [--condition text] [--out-dir dir]
//!   trialgraph fields

use clap::{ArgAction, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::Level;
use trialgraph::{
    write_graph, ClinicalTrialsAdapter, EdgeType, GraphSink, HttpStudySource, JsonLinesSink,
    NodeType, StudyField, TrialGraphConfig,
};

#[derive(Parser)]
#[command(
    name = "trialgraph",
    version,
    about = "Clinical-trial registry to knowledge-graph tuples"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every matching study and write nodes and edges as JSON lines
    Fetch {
        /// Path to a YAML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Condition filter (overrides the configured one)
        #[arg(long)]
        condition: Option<String>,
        /// Registry API root (overrides the configured one)
        #[arg(long)]
        base_url: Option<String>,
        /// Node types to produce (repeatable; default: all)
        #[arg(long = "node-type")]
        node_types: Vec<String>,
        /// Study fields to project (repeatable; default: all)
        #[arg(long = "field")]
        node_fields: Vec<String>,
        /// Edge types to produce (repeatable; default: all)
        #[arg(long = "edge-type")]
        edge_types: Vec<String>,
        /// Write nodes.jsonl and edges.jsonl here instead of stdout
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Print per-label counts to stderr when done
        #[arg(long)]
        summary: bool,
    },
    /// List recognized node types, study fields and edge types
    Fields,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// Config search order: explicit path, then `<config_dir>/trialgraph/config.yaml`, then defaults.
fn load_config(path: Option<PathBuf>) -> Result<TrialGraphConfig, String> {
    let path = path.or_else(|| {
        dirs::config_dir()
            .map(|dir| dir.join("trialgraph").join("config.yaml"))
            .filter(|p| p.is_file())
    });
    match path {
        Some(p) => TrialGraphConfig::load(&p).map_err(|e| format!("Failed to load config: {}", e)),
        None => Ok(TrialGraphConfig::default()),
    }
}

fn open_sink(out_dir: Option<&Path>) -> Result<Box<dyn GraphSink>, String> {
    let Some(dir) = out_dir else {
        return Ok(Box::new(JsonLinesSink::new(io::stdout(), io::stdout())));
    };
    std::fs::create_dir_all(dir).map_err(|e| format!("cannot create '{}': {}", dir.display(), e))?;
    let create = |name: &str| {
        let path = dir.join(name);
        File::create(&path)
            .map(BufWriter::new)
            .map_err(|e| format!("cannot create '{}': {}", path.display(), e))
    };
    Ok(Box::new(JsonLinesSink::new(create("nodes.jsonl")?, create("edges.jsonl")?)))
}

#[allow(clippy::too_many_arguments)]
fn cmd_fetch(
    config: Option<PathBuf>,
    condition: Option<String>,
    base_url: Option<String>,
    node_types: Vec<String>,
    node_fields: Vec<String>,
    edge_types: Vec<String>,
    out_dir: Option<PathBuf>,
    summary: bool,
) -> i32 {
    let mut config = match load_config(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if let Some(condition) = condition {
        config = config.with_condition(condition);
    }
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    if !node_types.is_empty() {
        config.selection.node_types = Some(node_types);
    }
    if !node_fields.is_empty() {
        config.selection.node_fields = Some(node_fields);
    }
    if !edge_types.is_empty() {
        config.selection.edge_types = Some(edge_types);
    }

    let source = match HttpStudySource::new(config.base_url.clone()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let adapter = match ClinicalTrialsAdapter::fetch(&source, &config.query, config.selection()) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut sink = match open_sink(out_dir.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    match write_graph(&adapter, sink.as_mut()) {
        Ok(written) => {
            if summary {
                let stats = adapter.stats();
                eprintln!(
                    "{} records, {} skipped without id",
                    stats.records_seen, stats.records_skipped
                );
                for node_type in NodeType::ALL {
                    let duplicates = stats.duplicates_of(node_type);
                    if duplicates > 0 {
                        eprintln!("{} duplicate {} keys", duplicates, node_type.as_str());
                    }
                }
                eprintln!("{}", written);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_fields() -> i32 {
    println!("NODE TYPES");
    for node_type in NodeType::ALL {
        println!("  {}", node_type.as_str());
    }
    println!("STUDY FIELDS");
    for field in StudyField::ALL {
        println!("  {:<24}  {}", field.as_str(), field.path());
    }
    println!("EDGE TYPES");
    for edge_type in EdgeType::ALL {
        println!("  {}", edge_type.as_str());
    }
    0
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let code = match cli.command {
        Commands::Fetch {
            config,
            condition,
            base_url,
            node_types,
            node_fields,
            edge_types,
            out_dir,
            summary,
        } => cmd_fetch(
            config,
            condition,
            base_url,
            node_types,
            node_fields,
            edge_types,
            out_dir,
            summary,
        ),
        Commands::Fields => cmd_fields(),
    };
    std::process::exit(code);
}
