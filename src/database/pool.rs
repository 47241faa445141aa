use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{info, warn};

/// Failure to establish the shared connection.
///
/// Cloneable so that one failed attempt can be handed to every caller that
/// was waiting on it.
#[derive(Debug, Clone, Error)]
#[error("Failed to connect to document store: {message}")]
pub struct ConnectError {
    message: Arc<str>,
}

impl ConnectError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Arc::from(message.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Something able to open a connection handle
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Handle: Clone + Send + Sync + 'static;

    async fn connect(&self) -> Result<Self::Handle, ConnectError>;
}

type PendingConnection<H> = Shared<BoxFuture<'static, Result<H, ConnectError>>>;

/// Lazily established, process-wide connection handle.
///
/// The first `acquire` starts establishment; every caller arriving before it
/// completes awaits the same attempt. A successful handle is kept for the
/// lifetime of the pool. A failed attempt is dropped so the next `acquire`
/// starts over.
pub struct ConnectionPool<C: Connector> {
    connector: Arc<C>,
    pending: Mutex<Option<PendingConnection<C::Handle>>>,
}

impl<C: Connector> ConnectionPool<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            pending: Mutex::new(None),
        }
    }

    /// Get the shared handle, establishing it if needed
    pub async fn acquire(&self) -> Result<C::Handle, ConnectError> {
        let attempt = self.current_or_start();
        let result = attempt.clone().await;

        if let Err(e) = &result {
            warn!("Document store connection attempt failed: {}", e);
            self.clear_if_current(&attempt);
        }

        result
    }

    /// Whether a connection has been established
    pub fn is_connected(&self) -> bool {
        self.lock()
            .as_ref()
            .and_then(|pending| pending.peek())
            .is_some_and(|result| result.is_ok())
    }

    fn current_or_start(&self) -> PendingConnection<C::Handle> {
        let mut pending = self.lock();
        if let Some(attempt) = pending.as_ref() {
            return attempt.clone();
        }

        info!("Establishing document store connection");
        let connector = Arc::clone(&self.connector);
        let attempt = async move { connector.connect().await }.boxed().shared();
        *pending = Some(attempt.clone());
        attempt
    }

    fn clear_if_current(&self, failed: &PendingConnection<C::Handle>) {
        let mut pending = self.lock();
        // A newer attempt may already be in flight; leave it alone.
        if pending.as_ref().is_some_and(|current| current.ptr_eq(failed)) {
            *pending = None;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<PendingConnection<C::Handle>>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
