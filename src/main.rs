use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::StreamExt;
use gce_inventory::config::Config;
use gce_inventory::service::{self, CollectRequest};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Inventory collector for Google Compute Engine
#[derive(Parser, Debug)]
#[command(name = "gce-inventory", version = gce_inventory::VERSION, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// GCP project to use
    #[arg(short, long, global = true)]
    project: Option<String>,

    /// Request JSON file with secret_data, options and filter
    #[arg(short, long, global = true)]
    request: Option<PathBuf>,

    /// Config file (defaults to <config dir>/gce-inventory/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Print the capability descriptor
    Init,
    /// Check that the project is reachable
    Verify,
    /// Collect instances and print one JSON record per line
    Collect,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// Log to a file; stdout carries the records
fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = Config::config_dir().join("gce-inventory.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(tracing_level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gce-inventory {} started with log level: {:?}", gce_inventory::VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn load_request(path: Option<&Path>) -> Result<CollectRequest> {
    let Some(path) = path else {
        return Ok(CollectRequest::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request {:?}", path))?;
    CollectRequest::from_json(&content)
}

fn print_json<T: serde::Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let config = Config::load(args.config.as_deref())?;
    let request = load_request(args.request.as_deref())?;
    let project = args.project.as_deref();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Init => print_json(&mut out, &service::init()?)?,
        Command::Verify => {
            let response = service::verify(&request, &config, project).await;
            print_json(&mut out, &response)?;
        },
        Command::Collect => {
            let mut records = Box::pin(service::collect(&request, &config, project).await?);
            while let Some(record) = records.next().await {
                print_json(&mut out, &record)?;
            }
        },
    }

    out.flush()?;
    Ok(())
}
