//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router sending every path and method to the proxy handler
//! - Wire up middleware (timeout, request ID, tracing)
//! - Bind server to listener
//! - Apply policy snapshots arriving from the config watcher
//! - Stop gracefully on shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::error::Result;
use crate::proxy::ReverseProxy;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<ReverseProxy>,
}

/// HTTP server for the masking proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    proxy: Arc<ReverseProxy>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self> {
        let proxy = Arc::new(ReverseProxy::new(&config)?);
        let state = AppState {
            proxy: proxy.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            proxy,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configs received on `config_updates` are applied as new policy snapshots.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ProxyConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.proxy.target(),
            "HTTP server starting"
        );

        let proxy = self.proxy.clone();
        let reloader = tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                proxy.reload(&new_config);
            }
        });

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config the server was started with.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn proxy(&self) -> &Arc<ReverseProxy> {
        &self.proxy
    }
}

/// Catch-all handler: every request goes through the proxy.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    state.proxy.serve(request).await
}
