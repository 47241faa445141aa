mod common;

use std::sync::Arc;

use anyhow::Result;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

use clarity_web::auth::JwtSessionStore;
use clarity_web::extract::ExtractorResponse;
use common::{MemoryAccounts, StubExtractor, EMAIL};

async fn spawn_with(accounts: MemoryAccounts) -> Result<common::TestApp> {
    common::spawn_app(accounts, StubExtractor::replying(ExtractorResponse::default())).await
}

#[tokio::test]
async fn unset_flag_reads_as_false() -> Result<()> {
    let app = spawn_with(MemoryAccounts::with_account(EMAIL, None)).await?;

    let res = app
        .client
        .get(app.url("/api/user/onboarding-status"))
        .header(header::COOKIE, app.session_cookie(Some(EMAIL)))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "onboardingCompleted": false }));

    Ok(())
}

#[tokio::test]
async fn stored_flag_is_returned() -> Result<()> {
    let app = spawn_with(MemoryAccounts::with_account(EMAIL, Some(true))).await?;

    let res = app
        .client
        .get(app.url("/api/user/onboarding-status"))
        .header(header::COOKIE, app.session_cookie(Some(EMAIL)))
        .send()
        .await?;

    assert_eq!(res.json::<Value>().await?["onboardingCompleted"], true);

    Ok(())
}

#[tokio::test]
async fn missing_account_is_not_found() -> Result<()> {
    let app = spawn_with(MemoryAccounts::default()).await?;

    for (method, path) in [
        (reqwest::Method::GET, "/api/user/onboarding-status"),
        (reqwest::Method::POST, "/api/user/reset-onboarding"),
        (reqwest::Method::POST, "/api/user/complete-onboarding"),
    ] {
        let res = app
            .client
            .request(method, app.url(path))
            .header(header::COOKIE, app.session_cookie(Some(EMAIL)))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", path);
        let body = res.json::<Value>().await?;
        assert_eq!(body["error"], "User not found");
    }

    Ok(())
}

#[tokio::test]
async fn reset_is_idempotent() -> Result<()> {
    let app = spawn_with(MemoryAccounts::with_account(EMAIL, Some(true))).await?;

    for _ in 0..3 {
        let res = app
            .client
            .post(app.url("/api/user/reset-onboarding"))
            .header(header::COOKIE, app.session_cookie(Some(EMAIL)))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body = res.json::<Value>().await?;
        assert_eq!(body["success"], true);
        assert!(body["message"].is_string());
        assert_eq!(app.accounts.flag(EMAIL), Some(Some(false)));
    }

    Ok(())
}

#[tokio::test]
async fn complete_then_reset_round_trip() -> Result<()> {
    let app = spawn_with(MemoryAccounts::with_account(EMAIL, None)).await?;
    let cookie = app.session_cookie(Some(EMAIL));

    let res = app
        .client
        .post(app.url("/api/user/complete-onboarding"))
        .header(header::COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let status = app
        .client
        .get(app.url("/api/user/onboarding-status"))
        .header(header::COOKIE, &cookie)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(status["onboardingCompleted"], true);

    app.client
        .post(app.url("/api/user/reset-onboarding"))
        .header(header::COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(app.accounts.flag(EMAIL), Some(Some(false)));

    Ok(())
}

#[tokio::test]
async fn unauthorized_before_any_storage_access() -> Result<()> {
    let app = spawn_with(MemoryAccounts::with_account(EMAIL, None)).await?;

    let cookies = [
        None,
        Some("next-auth.session-token=not-a-token".to_string()),
        Some(app.session_cookie(None)),
    ];

    for cookie in cookies {
        for (method, path) in [
            (reqwest::Method::GET, "/api/user/onboarding-status"),
            (reqwest::Method::POST, "/api/user/reset-onboarding"),
        ] {
            let mut req = app.client.request(method, app.url(path));
            if let Some(cookie) = &cookie {
                req = req.header(header::COOKIE, cookie);
            }
            let res = req.send().await?;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{} with {:?}", path, cookie);
            assert_eq!(res.json::<Value>().await?["error"], "Unauthorized");
        }
    }

    assert_eq!(app.accounts.calls(), 0);

    Ok(())
}

#[tokio::test]
async fn storage_faults_are_internal_errors() -> Result<()> {
    let accounts = MemoryAccounts::with_account(EMAIL, None);
    accounts.fail();
    let app = spawn_with(accounts).await?;

    let res = app
        .client
        .get(app.url("/api/user/onboarding-status"))
        .header(header::COOKIE, app.session_cookie(Some(EMAIL)))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Internal server error");
    assert!(!body.to_string().contains("connection refused"));

    Ok(())
}

#[tokio::test]
async fn health_reflects_store_state() -> Result<()> {
    let accounts = MemoryAccounts::default();
    let app = spawn_with(accounts).await?;

    let res = app.client.get(app.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    app.accounts.fail();
    let res = app.client.get(app.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    Ok(())
}

#[tokio::test]
async fn session_store_fault_is_internal_error_before_storage() -> Result<()> {
    let app = common::spawn_with_sessions(
        Arc::new(common::FailingSessions),
        Arc::new(JwtSessionStore::new(common::SECRET)?),
        MemoryAccounts::with_account(EMAIL, None),
        StubExtractor::replying(ExtractorResponse::default()),
    )
    .await?;

    for (method, path) in [
        (reqwest::Method::GET, "/api/user/onboarding-status"),
        (reqwest::Method::POST, "/api/user/reset-onboarding"),
    ] {
        let res = app
            .client
            .request(method, app.url(path))
            .header(header::COOKIE, app.session_cookie(Some(EMAIL)))
            .send()
            .await?;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", path);
        let body = res.json::<Value>().await?;
        assert_eq!(body["error"], "Internal server error");
        assert!(!body.to_string().contains("secret"));
    }

    assert_eq!(app.accounts.calls(), 0);

    Ok(())
}
