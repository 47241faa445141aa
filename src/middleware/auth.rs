use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::SessionUser;
use crate::error::ApiError;

/// Authenticated API caller; always has an email
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: String,
    pub name: Option<String>,
}

impl AuthUser {
    /// Sessions without an email cannot address an account
    pub fn from_session(user: SessionUser) -> Option<Self> {
        let email = user.email.filter(|e| !e.trim().is_empty())?;
        Some(Self {
            email,
            name: user.name,
        })
    }
}

/// Session authentication for API routes.
///
/// Rejects with 401 before the handler (and so before any storage access)
/// unless the session validates and carries an email.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = state.sessions.validate(request.headers()).await?;

    let auth_user = session.and_then(AuthUser::from_session).ok_or_else(|| {
        tracing::debug!("Unauthorized API request to {}", request.uri().path());
        ApiError::unauthorized("Unauthorized")
    })?;

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
