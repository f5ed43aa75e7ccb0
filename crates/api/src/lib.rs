//! # SlotWise API
//!
//! The web server for the SlotWise booking platform. It exposes slot
//! availability for a service on a given day and the booking operations
//! built on top of it, plus admin management of user roles.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Gather inputs from the record store and call into the core
//! - **Middleware**: Caller identity extraction and error mapping
//! - **Config**: Environment-driven server settings
//!
//! Handlers reach storage only through [`BookingStore`], so the same router
//! runs against PostgreSQL in production and a mock in tests.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Caller identity and error mapping
pub mod middleware;
/// Route definitions
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use eyre::{Result, WrapErr};
use slotwise_db::BookingStore;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Record store holding businesses, services, hours and bookings
    pub store: Arc<dyn BookingStore>,
}

impl ApiState {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }
}

/// Builds the router with every endpoint attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Liveness and build info
        .merge(routes::health::routes())
        // Slot availability
        .merge(routes::availability::routes())
        // Booking creation, listing and status changes
        .merge(routes::booking::routes())
        // Admin role management
        .merge(routes::profile::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ])
        .allow_origin(origins)
        .allow_credentials(true))
}

/// Starts the API server with the provided configuration and record store
///
/// Initializes logging, builds the router, and serves until the listener
/// fails.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use slotwise_api::{config::ApiConfig, start_server};
/// use slotwise_db::{create_pool, PgBookingStore};
///
/// # async fn run() -> eyre::Result<()> {
/// let config = ApiConfig::from_env()?;
/// let pool = create_pool(&config.database_url, config.database_max_connections).await?;
/// start_server(config, Arc::new(PgBookingStore::new(pool))).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn BookingStore>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::new(store));
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Request tracing and timeout
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
