//! logview - HTTP query service for stored logs
//!
//! Loads configuration, builds the store and retriever, and serves the
//! query API until interrupted.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use logview_core::LogRetriever;
use logview_server::{LogviewConfig, LogviewServer};
use logview_store::{LogStoreAdapter, MemoryStore, load_jsonl};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "logview")]
#[command(about = "Query service for logs stored in sorted-set indices")]
#[command(version)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the query server
    Serve {
        /// Path to config file
        #[arg(short, long, env = "LOGVIEW_CONFIG")]
        config: Option<PathBuf>,

        /// Address to bind, overriding the config file
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// JSON-lines file to load into the store, overriding the config file
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// Validate a config file and print the effective configuration
    CheckConfig {
        /// Path to config file
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format)?;

    match cli.command {
        Commands::Serve { config, bind, seed } => serve(config, bind, seed).await,
        Commands::CheckConfig { config } => check_config(&config),
    }
}

fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("logview=info".parse()?);

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(fmt::layer()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LogviewConfig> {
    match path {
        Some(path) => LogviewConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(LogviewConfig::default()),
    }
}

async fn serve(
    config_path: Option<PathBuf>,
    bind: Option<SocketAddr>,
    seed: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    if let Some(bind) = bind {
        config.server.bind_addr = bind;
    }
    if seed.is_some() {
        config.store.seed_file = seed;
    }
    config.validate()?;

    let addr = config.server.bind_addr;
    let keys = config.store.layout();
    info!(
        addr = %addr,
        key_prefix = keys.prefix(),
        timeout_ms = config.store.timeout_ms,
        "starting logview"
    );

    let store = MemoryStore::new();
    let seeded = match &config.store.seed_file {
        Some(path) => match load_jsonl(&store, &keys, path) {
            Ok(_) => true,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to seed store");
                false
            }
        },
        None => {
            warn!("no seed file configured, serving an empty store");
            true
        }
    };

    let server = if seeded {
        let store: Arc<dyn LogStoreAdapter> = Arc::new(store);
        let retriever = LogRetriever::new(store)
            .with_layout(keys)
            .with_defaults(config.discovery.to_defaults());
        LogviewServer::new(config, retriever)
    } else {
        warn!("starting without a retriever, log queries will return 503");
        LogviewServer::without_retriever(config)
    };

    server.serve_with_shutdown(addr, shutdown_signal()).await?;
    Ok(())
}

fn check_config(path: &Path) -> anyhow::Result<()> {
    let config = load_config(Some(path))?;
    let rendered = toml::to_string_pretty(&config).context("rendering config")?;
    println!("{rendered}");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
