//! API Server
//!
//! Binds the router behind CORS, timeout and tracing layers.

use super::{handlers::AppState, middleware::create_cors_layer, routes::create_router};
use crate::{config::ServerConfig, services::Services};
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::Duration,
};
use tokio::signal;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

/// Errors that stop the server
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// HTTP front end for the table and bet services
pub struct ApiServer {
    config: ServerConfig,
    services: Services,
}

impl ApiServer {
    pub fn new(config: ServerConfig, services: Services) -> Self {
        Self { config, services }
    }

    /// Serve until Ctrl+C or SIGTERM
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.socket_addr()?;
        let app = self.create_app();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        info!(
            %addr,
            timeout_secs = self.config.request_timeout_secs,
            origins = ?self.config.allowed_origins,
            "roulette API listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(ServerError::Serve)?;

        info!("API server stopped gracefully");
        Ok(())
    }

    /// Router with the full middleware stack
    pub fn create_app(&self) -> axum::Router {
        let state = Arc::new(AppState::new(self.services.clone()));

        create_router(state)
            // CORS before timeout to handle preflight
            .layer(create_cors_layer(self.config.allowed_origins.clone()))
            .layer(TimeoutLayer::new(Duration::from_secs(self.config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let ip: IpAddr = self
            .config
            .host
            .parse()
            .map_err(|_| ServerError::InvalidAddress(self.config.host.clone()))?;
        Ok(SocketAddr::from((ip, self.config.port)))
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
            ..ServerConfig::default()
        };
        let server = ApiServer::new(config, Services::in_memory());

        assert_eq!(
            server.socket_addr().expect("addr"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("parse")
        );
    }

    #[test]
    fn test_invalid_host() {
        let config = ServerConfig {
            host: "not-an-ip".to_string(),
            ..ServerConfig::default()
        };
        let server = ApiServer::new(config, Services::in_memory());

        assert!(matches!(server.socket_addr(), Err(ServerError::InvalidAddress(_))));
    }
}
