//! # memoize API Server
//!
//! REST API serving a profile through a single memoized, stale-while-revalidate slot.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness and version
//! - `GET /profile` - Cached profile for the configured id
//! - `DELETE /profile/cache` - Invalidate the cached profile
//! - `GET /profile/cache/stats` - Cache counters
//!
//! ## Example
//!
//! ```rust,ignore
//! use memoize_api::{ApiServer, ApiConfig};
//!
//! let config = ApiConfig::from_env()?;
//! let server = ApiServer::new(config);
//! server.run(([0, 0, 0, 0], 3001)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod routes;
mod handlers;
mod service;
mod source;
mod state;
mod dto;
mod error;

pub use routes::create_router;
pub use service::ProfileService;
pub use source::SimulatedProfileSource;
pub use state::{AppState, ApiConfig};
pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server for memoize.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            state: Arc::new(AppState::new(config)),
        }
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> memoize_core::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!(
            %addr,
            profile_id = %self.state.config.profile_id,
            ttl_secs = self.state.config.profile_ttl.as_secs(),
            cache = self.state.config.enable_cache,
            "memoize API server listening"
        );

        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}
