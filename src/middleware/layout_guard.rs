use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::edge_gate::LOGIN_PATH;
use crate::app::AppState;

/// Authoritative session check in front of the dashboard area.
///
/// Anything short of a validated session redirects to the login page and the
/// wrapped handler never runs. On success the [`crate::auth::SessionUser`] is
/// placed in the request extensions for the layout.
pub async fn layout_guard_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = state.sessions.validate(request.headers()).await;

    match session {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => {
            tracing::debug!("No valid session for {}, redirecting to login", request.uri().path());
            Redirect::temporary(LOGIN_PATH).into_response()
        }
        Err(e) => {
            tracing::error!("Session validation failed for {}: {}", request.uri().path(), e);
            Redirect::temporary(LOGIN_PATH).into_response()
        }
    }
}
