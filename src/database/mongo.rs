use async_trait::async_trait;
use mongodb::{bson::doc, options::ClientOptions, Client};
use tracing::info;

use super::pool::{ConnectError, ConnectionPool, Connector};
use crate::config::DatabaseConfig;

const APP_NAME: &str = "clarity-web";

/// Opens MongoDB clients from a connection string
pub struct MongoConnector {
    uri: String,
}

impl MongoConnector {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

#[async_trait]
impl Connector for MongoConnector {
    type Handle = Client;

    async fn connect(&self) -> Result<Client, ConnectError> {
        let mut options = ClientOptions::parse(&self.uri)
            .await
            .map_err(|e| ConnectError::new(format!("invalid connection string: {}", e)))?;
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options).map_err(|e| ConnectError::new(e.to_string()))?;

        // Client construction is lazy; ping so an unreachable server fails here.
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ConnectError::new(e.to_string()))?;

        info!("Connected to document store");
        Ok(client)
    }
}

pub type MongoPool = ConnectionPool<MongoConnector>;

/// Build the (not yet connected) pool for the configured database
pub fn mongo_pool(config: &DatabaseConfig) -> MongoPool {
    ConnectionPool::new(MongoConnector::new(config.uri.clone()))
}
