//! Schedule generator CLI.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use scheduler::catalog::load_catalog_file;
use scheduler::format;
use scheduler::generator::{self, ScheduleConfig};
use scheduler::server::create_router;
use scheduler::types::AppState;

#[derive(Parser)]
#[command(name = "scheduler")]
#[command(about = "Generates every conflict-free schedule for a set of courses")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate schedules once and print them.
    Generate {
        /// Catalog dump (JSON array of courses)
        #[arg(long)]
        catalog: PathBuf,
        /// Schedule configuration (rules, buffers, courses)
        #[arg(long)]
        config: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Give up after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Serve schedule generation over HTTP.
    Serve {
        /// Catalog dump (JSON array of courses)
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long, env = "SCHEDULER_ADDR", default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
        /// Per-request search timeout in seconds
        #[arg(long, default_value = "30")]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Generate {
            catalog,
            config,
            json,
            timeout_secs,
        } => {
            let catalog = load_catalog_file(&catalog)?;
            let config = ScheduleConfig::load_from_file(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            let deadline = timeout_secs.map(|s| Instant::now() + Duration::from_secs(s));

            let generation = generator::generate(&catalog, &config, deadline)?;
            for name in &generation.dropped {
                info!("Dropped {} (no usable sections)", name);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&generation.schedules)?);
            } else {
                print!(
                    "{}",
                    format::render(&generation.schedules, config.verbose || cli.verbose)
                );
            }
        }

        Commands::Serve {
            catalog,
            addr,
            timeout_secs,
        } => {
            let catalog = load_catalog_file(&catalog)?;
            let state = Arc::new(
                AppState::new(catalog).with_timeout(Duration::from_secs(timeout_secs)),
            );
            let app = create_router(state);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!("Listening on {}", addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutting down");
}
