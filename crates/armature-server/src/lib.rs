//! HTTP server for Armature
//!
//! Assembles the router from a [`RouteTable`], installs the authentication
//! gate, the exception filter and the ambient layers, and serves it.

mod auth;
mod cors;
mod exception;
mod handlers;
mod health;
mod json;
mod routes;
mod trace;

use std::net::SocketAddr;
use std::sync::Arc;

use armature_auth::JwtService;
use armature_config::Config;
use armature_core::Failure;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub use exception::ExceptionFilter;
pub use health::{
    DiskStorageIndicator, HealthIndicator, HealthReport, HealthService, HealthStatus, IndicatorResult,
    IndicatorStatus, MemoryRssIndicator,
};
pub use json::ApiJson;
pub use routes::{Access, RouteTable};

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server with only the built-in routes
    ///
    /// # Errors
    ///
    /// Returns an error if the error catalog or the token service cannot be
    /// built from the configuration
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Self::with_routes(config, RouteTable::new())
    }

    /// Build the server with the built-in routes plus `routes`
    ///
    /// # Errors
    ///
    /// Returns an error if the error catalog or the token service cannot be
    /// built from the configuration
    pub fn with_routes(config: &Config, routes: RouteTable) -> anyhow::Result<Self> {
        let catalog = Arc::new(config.error_catalog()?);
        let health = &config.server.health;

        let mut table = RouteTable::new().route("/auth/me", get(handlers::me), Access::Protected);

        if health.enabled {
            let service = HealthService::new()
                .with_indicator(MemoryRssIndicator::new(health.memory_rss_threshold))
                .with_indicator(DiskStorageIndicator::new(
                    &health.storage_path,
                    health.storage_threshold_percent,
                ));
            table = table.neutral_route(
                &health.path,
                get(health::health_handler).with_state(service),
                Access::Public,
            );
        }

        let (app, public_routes) = table.merge(routes).build(&config.api.version_prefix());

        // Known path with an unsupported method answers like an unknown path
        let mut app = app.method_not_allowed_fallback(|| async { Failure::not_found() });

        // Apply middleware layers (innermost first)

        // Authentication gate, matched routes only so unknown paths still 404
        if config.auth.enabled {
            let jwt = Arc::new(JwtService::from_config(&config.auth)?);
            let gate = auth::AuthGate::new(jwt, public_routes, config.auth.public_paths.clone());
            app = app.route_layer(from_fn_with_state(gate, auth::auth_middleware));
        } else {
            tracing::warn!("authentication is disabled, protected routes reject every request");
        }

        app = app
            .fallback(|| async { Failure::not_found() })
            .layer(DefaultBodyLimit::max(config.server.json_body_limit.as_usize()))
            .layer(CatchPanicLayer::custom(exception::panic_response));

        // Exception filter sees every failure, including panics and the fallback
        let filter = ExceptionFilter::new(catalog, config.environment);
        app = app.layer(from_fn_with_state(filter, exception::exception_middleware));

        // Tracing
        let skip = health.enabled.then_some(health.path.as_str());
        app = app.layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::RequestSpan::skipping(skip))
                .on_request(())
                .on_response(trace::LogResponse)
                .on_failure(()),
        );

        // CORS
        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Ok(Self {
            router: app,
            listen_address: config.server.listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
