use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{CredentialProbe, SessionStore};
use crate::config::SecurityConfig;
use crate::database::AccountStore;
use crate::error::ApiError;
use crate::extract::ContentExtractor;
use crate::handlers::{protected, public};
use crate::middleware::{edge_gate_middleware, layout_guard_middleware, session_auth_middleware};

/// Collaborators shared by every request, wired once in `main`
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub credentials: Arc<dyn CredentialProbe>,
    pub accounts: Arc<dyn AccountStore>,
    pub extractor: Arc<dyn ContentExtractor>,
}

/// Full application router: edge gate in front of every route
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/login", get(public::page))
        .route("/register", get(public::page))
        // Gated by cookie presence only
        .route("/simplify", get(public::page))
        // Session required
        .merge(dashboard_routes(state.clone()))
        .merge(api_routes(state.clone()))
        .fallback(not_found)
        // Global middleware
        .layer(from_fn_with_state(state.clone(), edge_gate_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn dashboard_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(protected::dashboard_layout))
        .route("/dashboard/*rest", get(protected::dashboard_layout))
        .route_layer(from_fn_with_state(state, layout_guard_middleware))
}

fn api_routes(state: AppState) -> Router<AppState> {
    use protected::user;

    Router::new()
        .route("/api/user/onboarding-status", get(user::onboarding_status))
        .route("/api/user/reset-onboarding", post(user::onboarding_reset))
        .route("/api/user/complete-onboarding", post(user::onboarding_complete))
        .route("/api/extract", post(protected::extract))
        .route_layer(from_fn_with_state(state, session_auth_middleware))
}

/// CORS for the configured frontend origins; cookies are allowed through
pub fn cors_layer(config: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
