//! Axum HTTP server

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use twinplay_core::{ServerConfig, Session};

use super::routes::build_router;
use crate::{Result, SyncError};

/// State shared across all requests
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
}

/// HTTP endpoint the partner uses to drive this instance.
///
/// Binding happens up front so a port conflict surfaces at startup rather
/// than inside a background task.
pub struct ControlServer {
    listener: TcpListener,
    session: Arc<Session>,
}

impl ControlServer {
    /// Bind the listening socket
    pub async fn bind(config: &ServerConfig, session: Arc<Session>) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| SyncError::Bind(format!("{}: {}", addr, e)))?;

        Ok(Self { listener, session })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Router with state and request logging applied
    pub fn router(session: Arc<Session>) -> Router {
        build_router()
            .layer(middleware::from_fn(log_requests))
            .with_state(AppState { session })
    }

    /// Serve requests until the process exits
    pub async fn run(self) -> Result<()> {
        let addr = self.local_addr()?;
        let app = Self::router(self.session);

        tracing::info!("Control server listening on {}", addr);

        axum::serve(self.listener, app.into_make_service())
            .await
            .map_err(|e| SyncError::Http(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Spawn the server in a background task
    pub fn spawn(self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}

/// Request logging middleware
async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::debug!(
        %method,
        %path,
        status = response.status().as_u16(),
        "Control request"
    );
    response
}
