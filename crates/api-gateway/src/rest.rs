//! HTTP server

use std::future::Future;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tracing::info;

use crate::routes::{build_router, AppState};

/// REST API server
pub struct RestApi {
    /// Address to bind
    addr: SocketAddr,

    /// Fully layered router
    router: Router,
}

impl RestApi {
    /// Creates a new server for `bind_address` (`host:port`)
    pub fn new(bind_address: &str, state: AppState) -> Result<Self> {
        let addr: SocketAddr = bind_address
            .parse()
            .with_context(|| format!("Invalid bind address: {}", bind_address))?;

        Ok(Self {
            addr,
            router: build_router(state),
        })
    }

    /// Address the server binds to
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serves requests until `shutdown` resolves
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("API listening on {}", self.addr);

        axum::Server::try_bind(&self.addr)
            .with_context(|| format!("Failed to bind {}", self.addr))?
            .serve(self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server error")?;

        info!("API server stopped");

        Ok(())
    }
}
