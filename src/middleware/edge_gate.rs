use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::app::AppState;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Path prefixes that require a session
const PROTECTED_PREFIXES: [&str; 2] = ["/dashboard", "/simplify"];

/// Prefixes (after the leading slash) the gate never looks at
const EXCLUDED_PREFIXES: [&str; 4] = ["api", "_next/static", "_next/image", "favicon.ico"];

/// What the gate does with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    PassThrough,
    RedirectToLogin { callback_url: String },
    RedirectToDashboard,
}

impl GateDecision {
    pub fn location(&self) -> Option<String> {
        match self {
            GateDecision::PassThrough => None,
            GateDecision::RedirectToLogin { callback_url } => Some(login_location(callback_url)),
            GateDecision::RedirectToDashboard => Some(DASHBOARD_PATH.to_string()),
        }
    }
}

/// API routes, framework assets and anything that looks like a file
pub fn is_excluded(path: &str) -> bool {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    EXCLUDED_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix)) || path.contains('.')
}

pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

pub fn is_auth_page(path: &str) -> bool {
    path == LOGIN_PATH || path == REGISTER_PATH
}

/// Classify a request by path and whether it carries a session cookie
pub fn decide(path: &str, has_session: bool) -> GateDecision {
    if is_excluded(path) {
        return GateDecision::PassThrough;
    }

    if is_protected(path) && !has_session {
        return GateDecision::RedirectToLogin {
            callback_url: path.to_string(),
        };
    }

    if is_auth_page(path) && has_session {
        return GateDecision::RedirectToDashboard;
    }

    GateDecision::PassThrough
}

/// `/login?callbackUrl=<path>` with the path query-encoded
pub fn login_location(callback_url: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("callbackUrl", callback_url)
        .finish();
    format!("{}?{}", LOGIN_PATH, query)
}

/// Cookie-presence gate run ahead of every route.
///
/// Only checks that a session cookie exists; routes that need an actual
/// identity validate it themselves.
pub async fn edge_gate_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if is_excluded(&path) {
        return next.run(request).await;
    }

    let has_session = state.credentials.has_credential(request.headers());
    let decision = decide(&path, has_session);

    match decision.location() {
        Some(location) => {
            tracing::debug!("Edge gate redirecting {} -> {}", path, location);
            Redirect::temporary(&location).into_response()
        }
        None => next.run(request).await,
    }
}
