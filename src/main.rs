use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use clarity_web::auth::{JwtSessionStore, SessionCookieProbe};
use clarity_web::config::AppConfig;
use clarity_web::database::{mongo_pool, MongoAccountStore};
use clarity_web::extract::ReadabilityClient;
use clarity_web::{app, AppState};

#[derive(Parser)]
#[command(name = "clarity-web", version, about = "ClarityWeb server")]
struct Args {
    #[arg(long, help = "Bind host (overrides CLARITY_HOST)")]
    host: Option<String>,

    #[arg(long, help = "Bind port (overrides CLARITY_PORT / PORT)")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up MONGODB_URI, NEXTAUTH_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("clarity_web=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    tracing::info!("Starting ClarityWeb in {:?} mode", config.environment);

    // Composition root: one connection pool for the process, injected into the store
    let pool = Arc::new(mongo_pool(&config.database));
    let state = AppState {
        sessions: Arc::new(JwtSessionStore::new(&config.auth.secret)?),
        credentials: Arc::new(SessionCookieProbe),
        accounts: Arc::new(MongoAccountStore::new(pool, &config.database)),
        extractor: Arc::new(ReadabilityClient::from_config(&config.extractor)?),
    };

    let app = app::router(state).layer(app::cors_layer(&config.security));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("ClarityWeb listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("ClarityWeb stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
