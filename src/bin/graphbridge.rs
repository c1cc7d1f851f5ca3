//! graphbridge CLI: dispatches JSON messages to a graph endpoint.
//!
//! Usage:
//!   graphbridge send --operation CREATE_NODE [--body JSON] [--uri URI | --db path | --config file.yaml]
//!   graphbridge pipe [--uri URI | --db path | --config file.yaml]  < messages.jsonl

use clap::{Parser, Subcommand};
use graphbridge::{
    Body, ConfigError, EndpointConfig, Exchange, GraphEndpoint, GraphProducer, Message, SqliteGraph,
    StoreTemplate, HEADER_OPERATION,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    name = "graphbridge",
    version,
    about = "Route messages to graph operations"
)]
struct Cli {
    /// Log level
    #[arg(
        long,
        global = true,
        default_value = "warn",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Target {
    /// Endpoint URI (graph:memory or graph:embedded:<path>)
    #[arg(long, conflicts_with = "db")]
    uri: Option<String>,
    /// Path to SQLite database file
    #[arg(long)]
    db: Option<PathBuf>,
    /// YAML endpoint configuration file (uri: <URI>)
    #[arg(long, conflicts_with_all = ["uri", "db"])]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single message built from arguments
    Send {
        #[command(flatten)]
        target: Target,
        /// Operation code (e.g. CREATE_NODE)
        #[arg(long)]
        operation: String,
        /// Message body as JSON (e.g. '{"properties":{"name":"alice"}}')
        #[arg(long)]
        body: Option<String>,
    },
    /// Process one JSON message per stdin line
    Pipe {
        #[command(flatten)]
        target: Target,
    },
}

/// Get the default database path (~/.local/share/graphbridge/graph.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("graphbridge").join("graph.db")
}

fn endpoint_config(target: Target) -> Result<EndpointConfig, ConfigError> {
    if let Some(path) = target.config {
        return EndpointConfig::from_yaml_file(path);
    }
    Ok(match (target.uri, target.db) {
        (Some(uri), _) => EndpointConfig::new(uri),
        (None, Some(db)) => EndpointConfig::embedded(db),
        (None, None) => EndpointConfig::embedded(default_db_path()),
    })
}

fn open_producer(target: Target) -> Result<GraphProducer<StoreTemplate<SqliteGraph>>, String> {
    let config =
        endpoint_config(target).map_err(|e| format!("Failed to load endpoint config: {}", e))?;
    let endpoint = GraphEndpoint::open(&config)
        .map_err(|e| format!("Failed to open endpoint '{}': {}", config.uri, e))?;
    Ok(endpoint.create_producer())
}

fn init_logging(level: &str) -> Result<(), String> {
    let level: Level = level
        .parse()
        .map_err(|_| format!("invalid log level '{}'", level))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to install logger: {}", e);
    }
    Ok(())
}

fn cmd_send(
    producer: &GraphProducer<StoreTemplate<SqliteGraph>>,
    operation: &str,
    body: Option<&str>,
) -> i32 {
    let body: Body = match body.map(serde_json::from_str::<Body>).transpose() {
        Ok(body) => body.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: invalid body: {}", e);
            return 1;
        }
    };
    let message = Message::new()
        .with_header(HEADER_OPERATION, operation)
        .with_body(body);

    let mut exchange = Exchange::new(message);
    if let Err(e) = producer.process(&mut exchange) {
        eprintln!("Error: {}", e);
        return 1;
    }
    match serde_json::to_string(exchange.message()) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_pipe(producer: &GraphProducer<StoreTemplate<SqliteGraph>>) -> i32 {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut failures = 0usize;

    for (index, line) in stdin.lock().lines().enumerate() {
        let line_no = index + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error: failed to read stdin: {}", e);
                return 1;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let message: Message = match serde_json::from_str(&line) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("Error: line {}: invalid message: {}", line_no, e);
                failures += 1;
                continue;
            }
        };

        let mut exchange = Exchange::new(message);
        if let Err(e) = producer.process(&mut exchange) {
            eprintln!("Error: line {}: {}", line_no, e);
            failures += 1;
            continue;
        }

        let written = serde_json::to_string(exchange.message())
            .map_err(|e| e.to_string())
            .and_then(|json| writeln!(out, "{}", json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("Error: line {}: {}", line_no, e);
            failures += 1;
        }
    }

    if failures > 0 {
        1
    } else {
        0
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    let code = match cli.command {
        Commands::Send {
            target,
            operation,
            body,
        } => match open_producer(target) {
            Ok(producer) => cmd_send(&producer, &operation, body.as_deref()),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Commands::Pipe { target } => match open_producer(target) {
            Ok(producer) => cmd_pipe(&producer),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
    };
    std::process::exit(code);
}
