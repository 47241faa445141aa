#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Duration;

use axum::http::HeaderMap;
use clarity_web::auth::{
    JwtSessionStore, SessionCookieProbe, SessionError, SessionStore, SessionUser, SESSION_COOKIE,
};
use clarity_web::database::{AccountError, AccountStore, ConnectError};
use clarity_web::extract::{ContentExtractor, ExtractorError, ExtractorResponse};
use clarity_web::{router, AppState};

pub const SECRET: &str = "integration-test-secret";
pub const EMAIL: &str = "ada@example.com";

/// Accounts keyed by email; the value is the stored flag (`None` = unset)
#[derive(Default)]
pub struct MemoryAccounts {
    accounts: Mutex<HashMap<String, Option<bool>>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryAccounts {
    pub fn with_account(email: &str, flag: Option<bool>) -> Self {
        let store = Self::default();
        store.insert(email, flag);
        store
    }

    pub fn insert(&self, email: &str, flag: Option<bool>) {
        self.accounts.lock().unwrap().insert(email.to_string(), flag);
    }

    pub fn flag(&self, email: &str) -> Option<Option<bool>> {
        self.accounts.lock().unwrap().get(email).copied()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<(), AccountError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AccountError::Connection(ConnectError::new("connection refused")));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryAccounts {
    async fn onboarding_status(&self, email: &str) -> Result<Option<bool>, AccountError> {
        self.enter()?;
        Ok(self.flag(email).map(|flag| flag.unwrap_or(false)))
    }

    async fn set_onboarding_completed(&self, email: &str, completed: bool) -> Result<u64, AccountError> {
        self.enter()?;
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.get_mut(email) {
            Some(flag) => {
                *flag = Some(completed);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), AccountError> {
        self.enter()
    }
}

/// Replays a canned collaborator reply and records the URLs it was asked for
pub struct StubExtractor {
    reply: Option<ExtractorResponse>,
    pub urls: Mutex<Vec<String>>,
}

impl StubExtractor {
    pub fn replying(reply: ExtractorResponse) -> Self {
        Self {
            reply: Some(reply),
            urls: Mutex::new(Vec::new()),
        }
    }

    /// Every call faults
    pub fn broken() -> Self {
        Self {
            reply: None,
            urls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ContentExtractor for StubExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractorResponse, ExtractorError> {
        self.urls.lock().unwrap().push(url.to_string());
        self.reply
            .clone()
            .ok_or_else(|| ExtractorError::InvalidResponse("upstream exploded".to_string()))
    }
}

/// Session store whose backend is down: every validation faults
pub struct FailingSessions;

#[async_trait]
impl SessionStore for FailingSessions {
    async fn validate(&self, _headers: &HeaderMap) -> Result<Option<SessionUser>, SessionError> {
        Err(SessionError::MissingSecret)
    }
}

pub struct TestApp {
    pub base_url: String,
    pub accounts: Arc<MemoryAccounts>,
    pub extractor: Arc<StubExtractor>,
    sessions: Arc<JwtSessionStore>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// A signed session cookie for `email`
    pub fn session_cookie(&self, email: Option<&str>) -> String {
        let user = SessionUser {
            email: email.map(str::to_string),
            name: Some("Ada Lovelace".to_string()),
        };
        let token = self
            .sessions
            .issue(&user, Duration::hours(1))
            .expect("issue session token");
        format!("{}={}", SESSION_COOKIE, token)
    }
}

pub async fn spawn_app(accounts: MemoryAccounts, extractor: StubExtractor) -> Result<TestApp> {
    let sessions = Arc::new(JwtSessionStore::new(SECRET)?);
    spawn_with_sessions(sessions.clone(), sessions, accounts, extractor).await
}

/// Wire `validator` into the app; `issuer` still signs the test cookies
pub async fn spawn_with_sessions(
    validator: Arc<dyn SessionStore>,
    issuer: Arc<JwtSessionStore>,
    accounts: MemoryAccounts,
    extractor: StubExtractor,
) -> Result<TestApp> {
    let accounts = Arc::new(accounts);
    let extractor = Arc::new(extractor);
    let sessions = issuer;

    let state = AppState {
        sessions: validator,
        credentials: Arc::new(SessionCookieProbe),
        accounts: accounts.clone(),
        extractor: extractor.clone(),
    };

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, router(state)).await;
    });

    // Redirects are asserted on, never followed
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    Ok(TestApp {
        base_url: format!("http://127.0.0.1:{}", port),
        accounts,
        extractor,
        sessions,
        client,
    })
}

pub async fn spawn_default() -> Result<TestApp> {
    spawn_app(
        MemoryAccounts::with_account(EMAIL, None),
        StubExtractor::replying(ExtractorResponse::default()),
    )
    .await
}
