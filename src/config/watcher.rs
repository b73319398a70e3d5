//! Config file watcher behind `--watch`.
//!
//! # Responsibilities
//! - Re-read the config file when it is modified or recreated
//! - Hand only valid configs that differ from the last one to the server
//!
//! # Design Decisions
//! - A single save often raises several modify events; identical content is sent once
//! - An invalid file is logged and skipped; the running snapshot stays in place

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ProxyConfig;

/// Watches one config file and sends each new valid [`ProxyConfig`] it finds.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ProxyConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end the server reloads from.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ProxyConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching on notify's background thread.
    ///
    /// The returned handle must be kept alive for as long as updates are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, update_tx } = self;
        let mut current = load_config(&path).ok();
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    if let Some(config) = changed_config(&watched, &mut current) {
                        tracing::info!(path = ?watched, "Config file changed, sending new snapshot");
                        let _ = update_tx.send(config);
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}

/// Load `path` and return it if it parses, validates and differs from `current`.
fn changed_config(path: &Path, current: &mut Option<ProxyConfig>) -> Option<ProxyConfig> {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Config reload rejected, keeping current snapshot");
            return None;
        }
    };

    if current.as_ref() == Some(&config) {
        tracing::debug!("Config file touched without changes");
        return None;
    }
    *current = Some(config.clone());
    Some(config)
}
