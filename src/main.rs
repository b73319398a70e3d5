//! Masking reverse proxy.
//!
//! ```text
//!     Client ──▶ listener ──▶ inbound log ──▶ deny rules ──403──▶ Client
//!                              (unmasked)         │
//!                                                 ▼
//!                                          query masking
//!                                                 │
//!     Client ◀── outbound log ◀───────────── backend call ──▶ Backend
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use masking_proxy::config::load_config;
use masking_proxy::config::watcher::ConfigWatcher;
use masking_proxy::lifecycle::signals::wait_for_signal;
use masking_proxy::observability::logging;
use masking_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "masking-proxy")]
#[command(about = "Reverse proxy that blocks denied requests and masks PII in query strings", long_about = None)]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(default_value = "config.json")]
    config: PathBuf,

    /// Override the listener bind address from the config file.
    #[arg(short, long)]
    bind: Option<String>,

    /// Reload deny rules and masking settings when the config file changes.
    #[arg(short, long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            tracing::error!(
                path = %cli.config.display(),
                error = %e,
                "Unable to load configuration file. Please specify it as an argument to the program."
            );
            return Err(e.into());
        }
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability.log_level);
    tracing::info!("masking-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        backend = %config.server,
        bind_address = %config.listener.bind_address,
        deny_headers = ?config.deny.headers,
        deny_params = ?config.deny.url_params,
        masking_scope = ?config.masking.scope,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let (config_updates, _watcher) = if cli.watch {
        let (watcher, updates) = ConfigWatcher::new(&cli.config);
        (updates, Some(watcher.run()?))
    } else {
        let (_, updates) = mpsc::unbounded_channel();
        (updates, None)
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
