use axum::http::{header::COOKIE, HeaderMap};

/// Session cookie set by the authentication provider over plain HTTP
pub const SESSION_COOKIE: &str = "next-auth.session-token";

/// Session cookie set by the authentication provider over HTTPS
pub const SECURE_SESSION_COOKIE: &str = "__Secure-next-auth.session-token";

/// Find a cookie by name across every `Cookie` header of the request
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Raw session token, preferring the secure-prefixed variant
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    cookie_value(headers, SECURE_SESSION_COOKIE).or_else(|| cookie_value(headers, SESSION_COOKIE))
}

/// Fast, unauthenticated credential check.
///
/// Implementations only look at what the request carries; they never
/// verify it. A `true` answer must be confirmed by a [`super::SessionStore`]
/// before anything is trusted.
pub trait CredentialProbe: Send + Sync {
    fn has_credential(&self, headers: &HeaderMap) -> bool;
}

/// Treats the presence of either session cookie variant as a credential
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionCookieProbe;

impl CredentialProbe for SessionCookieProbe {
    fn has_credential(&self, headers: &HeaderMap) -> bool {
        session_token(headers).is_some()
    }
}
