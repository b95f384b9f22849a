//! webrpc HTTP Server
//!
//! Serves registered services over axum on a TCP listener.

use crate::error::ServerError;
use crate::handler::{self, AppState};
use crate::types::TRACE_ID_HEADER;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method};
use axum::routing::get;
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use webrpc_core::application::DEFAULT_BASE_PATH;
use webrpc_core::{RequestContext, Service};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

const ENV_HOST: &str = "WEBRPC_HOST";
const ENV_PORT: &str = "WEBRPC_PORT";
const ENV_PREFIX: &str = "WEBRPC_PREFIX";

/// HTTP Server Configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
    /// Base path services are mounted under
    pub base_path: String,
    pub max_body_bytes: usize,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            base_path: DEFAULT_BASE_PATH.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl RpcServerConfig {
    /// Defaults overridden by `WEBRPC_HOST`, `WEBRPC_PORT` and `WEBRPC_PREFIX`
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var(ENV_HOST).unwrap_or(defaults.host);

        let port = match std::env::var(ENV_PORT) {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Invalid {}, using default {}", ENV_PORT, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            Err(_) => defaults.port,
        };

        let base_path = std::env::var(ENV_PREFIX).unwrap_or(defaults.base_path);

        Self {
            host,
            port,
            base_path,
            max_body_bytes: defaults.max_body_bytes,
        }
    }

    pub fn addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress {
            addr,
            reason: e.to_string(),
        })
    }
}

/// HTTP Server
pub struct RpcServer {
    config: RpcServerConfig,
    services: Vec<Arc<Service<RequestContext>>>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig) -> Self {
        Self {
            config,
            services: Vec::new(),
        }
    }

    pub fn config(&self) -> &RpcServerConfig {
        &self.config
    }

    /// Mount a service; its prefix comes from the service itself and must
    /// sit under the configured base path (checked by [`router`](Self::router)).
    pub fn register(mut self, service: Service<RequestContext>) -> Self {
        self.services.push(Arc::new(service));
        self
    }

    /// Build the axum router (also used directly by tests).
    pub fn router(&self) -> Result<Router, ServerError> {
        if self.services.is_empty() {
            return Err(ServerError::NoServices);
        }
        let base = format!("{}/", self.config.base_path.trim_end_matches('/'));
        for (i, service) in self.services.iter().enumerate() {
            if !service.prefix().starts_with(&base) {
                return Err(ServerError::PrefixOutsideBase {
                    prefix: service.prefix().to_string(),
                    base_path: self.config.base_path.clone(),
                });
            }
            if self.services[..i]
                .iter()
                .any(|s| s.prefix() == service.prefix())
            {
                return Err(ServerError::DuplicatePrefix(service.prefix().to_string()));
            }
        }

        let state = AppState {
            services: Arc::new(self.services.clone()),
            max_body_bytes: self.config.max_body_bytes,
        };

        let webrpc = HeaderName::from_static("webrpc");
        let trace = HeaderName::from_static(TRACE_ID_HEADER);
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE, webrpc.clone(), trace.clone()])
            .expose_headers([CONTENT_TYPE, webrpc, trace]);

        Ok(Router::new()
            .route("/", get(handler::index))
            .route("/health", get(handler::health))
            .fallback(handler::rpc)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors)
                    .layer(middleware::from_fn(handler::trace_id)),
            )
            .with_state(state))
    }

    /// Bind and serve in a background task.
    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let app = self.router()?;
        let addr = self.config.addr()?;

        info!(
            host = %self.config.host,
            port = %self.config.port,
            services = self.services.len(),
            "Starting webrpc server"
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        for service in &self.services {
            info!(
                prefix = service.prefix(),
                schema = %service.header_value(),
                "Mounted service"
            );
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    while !*shutdown_rx.borrow() {
                        if shutdown_rx.changed().await.is_err() {
                            break;
                        }
                    }
                })
                .await
        });

        info!(addr = %local_addr, "webrpc server listening");

        Ok(ServerHandle {
            local_addr,
            shutdown_tx,
            task,
        })
    }
}

/// Handle to a running server
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Base URL for clients, e.g. `http://127.0.0.1:3000`
    pub fn url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn stop(self) -> Result<(), ServerError> {
        info!("Stopping webrpc server");
        let _ = self.shutdown_tx.send(true);
        self.task.await??;
        info!("webrpc server stopped");
        Ok(())
    }
}
