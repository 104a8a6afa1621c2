//! # Workload HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Public Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /config` - Engine constants in use
//! - `POST /calculate` - Calculate metrics for a programme (nothing stored)
//! - `POST /submissions` - Calculate and store a submission
//!
//! ## Administrator Endpoints (hashed key required)
//!
//! - `GET /admin/submissions` - List stored submissions
//! - `GET /admin/submissions/{id}` - One stored submission
//! - `GET /admin/summary` - Aggregate dashboard figures
//! - `GET /admin/export?format=csv|json` - Flat export with BLAKE3 checksum
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `WORKLOAD_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `WORKLOAD_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `WORKLOAD_ADMIN_KEY_HASH`: BLAKE3 hex digest of the admin key; admin routes are disabled without it

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{
    AdminKeyHash, get_admin_key_hash_from_env, hash_admin_key, hash_admin_key_hex,
    parse_admin_key_hash,
};
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
// Re-export handlers and types for integration tests (via `workload::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    calculate_handler, config_handler, export_handler, get_submission_handler, health_handler,
    list_submissions_handler, submit_handler, summary_handler,
};
pub use types::{
    CalculateResponse, ExportQuery, ExportResponse, HealthResponse, SubmissionListResponse,
    SubmissionResponse, SubmitResponse, SummaryResponse,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use workload_core::{CalculationEngine, SubmissionStore, WorkloadError};

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the engine, the submission store and the admin credential.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<CalculationEngine>,
    pub store: Arc<SubmissionStore>,
    /// Digest of the admin key; `None` disables admin routes.
    pub admin_key_hash: Option<Arc<AdminKeyHash>>,
}

impl AppState {
    /// Create app state with admin routes disabled.
    #[must_use]
    pub fn new(engine: CalculationEngine, store: SubmissionStore) -> Self {
        Self {
            engine: Arc::new(engine),
            store: Arc::new(store),
            admin_key_hash: None,
        }
    }

    /// Enable admin routes for the key with this digest.
    #[must_use]
    pub fn with_admin_key_hash(mut self, hash: AdminKeyHash) -> Self {
        self.admin_key_hash = Some(Arc::new(hash));
        self
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from `WORKLOAD_CORS_ORIGINS`.
///
/// - `*`: all origins (development only)
/// - unset: localhost only
/// - otherwise: comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("WORKLOAD_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (WORKLOAD_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in WORKLOAD_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No WORKLOAD_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate Limiting - protects against floods (if enabled)
/// 4. Admin authentication - `/admin/*` only
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    if state.admin_key_hash.is_some() {
        tracing::info!("Admin authentication enabled");
    } else {
        tracing::warn!(
            "Admin routes DISABLED: set WORKLOAD_ADMIN_KEY_HASH (see `workload admin-hash`) to enable them."
        );
    }

    let admin = Router::new()
        .route("/submissions", get(handlers::list_submissions_handler))
        .route("/submissions/{id}", get(handlers::get_submission_handler))
        .route("/summary", get(handlers::summary_handler))
        .route("/export", get(handlers::export_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::admin_auth_middleware,
        ));

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/config", get(handlers::config_handler))
        .route("/calculate", post(handlers::calculate_handler))
        .route("/submissions", post(handlers::submit_handler))
        .nest("/admin", admin);

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(256 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), WorkloadError> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| WorkloadError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Workload HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| WorkloadError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
