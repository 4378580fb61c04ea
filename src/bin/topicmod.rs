//! topicmod CLI: delete or merge tags against a SQLite store.
//!
//! Usage:
//!   topicmod delete <TAG_ID> [--db path] [--config path]
//!   topicmod merge <TAG_ID> [--db path] [--config path]
//!   topicmod consume [--db path] [--config path]   (JSON lines on stdin)

use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use topicmod::{
    ConsolidationReport, ModifierConfig, NodeId, OpenStore, SqliteStore, TagModification,
    TagModifier, Worker,
};

#[derive(Parser)]
#[command(name = "topicmod", version, about = "Delete or merge tags, keeping documents and associations consistent")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Path to YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip a tag from all documents and drop its associations
    Delete {
        /// Tag to delete
        tag_id: String,
    },
    /// Merge a tag into its synonym
    Merge {
        /// Tag to merge away
        tag_id: String,
    },
    /// Read {"tagId","status"} messages from stdin, one per line
    Consume,
}

fn init_logging(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn open_worker(db_path: PathBuf) -> Result<Worker, String> {
    let store = SqliteStore::open(&db_path)
        .map_err(|e| format!("Failed to open database {}: {}", db_path.display(), e))?;
    let modifier = TagModifier::new(Arc::new(store));
    Ok(Worker::new(Arc::new(modifier)))
}

fn print_report(report: &ConsolidationReport, json: bool) {
    if json {
        match serde_json::to_string(report) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("Error: cannot encode report: {}", e),
        }
    } else {
        println!("{}", report);
        for skipped in &report.skipped {
            println!("  skipped {}: {}", skipped.document_id, skipped.reason);
        }
    }
}

fn cmd_apply(worker: &Worker, message: TagModification, json: bool) -> i32 {
    match worker.apply(&message) {
        Ok(report) => {
            print_report(&report, json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_consume(worker: &Worker, json: bool) -> i32 {
    let mut failures = 0usize;
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error: reading stdin: {}", e);
                return 1;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match worker.handle(line.as_bytes()) {
            Ok(report) => print_report(&report, json),
            Err(e) => {
                // Logged by the worker; keep consuming
                tracing::debug!("message failed: {}", e);
                eprintln!("Error: {}", e);
                failures += 1;
            }
        }
    }
    if failures > 0 {
        eprintln!("{} message(s) failed", failures);
        1
    } else {
        0
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => match ModifierConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => ModifierConfig::default(),
    };
    init_logging(&config.log_filter);

    let db_path = cli.db.clone().unwrap_or_else(|| config.resolved_db_path());
    let worker = match open_worker(db_path) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Delete { tag_id } => {
            cmd_apply(&worker, TagModification::delete(NodeId::from(tag_id)), cli.json)
        }
        Commands::Merge { tag_id } => {
            cmd_apply(&worker, TagModification::merge(NodeId::from(tag_id)), cli.json)
        }
        Commands::Consume => cmd_consume(&worker, cli.json),
    };
    std::process::exit(code);
}
