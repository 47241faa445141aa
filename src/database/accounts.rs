use async_trait::async_trait;
use mongodb::{
    bson::{doc, Document},
    Collection,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use super::mongo::MongoPool;
use super::pool::ConnectError;
use crate::config::DatabaseConfig;

/// Errors from account storage
#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Connection(#[from] ConnectError),

    #[error("Storage error: {0}")]
    Storage(#[from] mongodb::error::Error),
}

/// The slice of a user account document read by the status endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnboardingProjection {
    #[serde(rename = "onboardingCompleted", default)]
    pub onboarding_completed: Option<bool>,
}

/// Account persistence keyed by email
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// `None` when no account has this email. An unset flag reads as `false`.
    async fn onboarding_status(&self, email: &str) -> Result<Option<bool>, AccountError>;

    /// Set the flag; returns how many accounts matched `email`.
    async fn set_onboarding_completed(&self, email: &str, completed: bool) -> Result<u64, AccountError>;

    /// Round-trip to the store
    async fn ping(&self) -> Result<(), AccountError>;
}

/// Accounts held in a MongoDB collection
pub struct MongoAccountStore {
    pool: Arc<MongoPool>,
    database: String,
    collection: String,
}

impl MongoAccountStore {
    pub fn new(pool: Arc<MongoPool>, config: &DatabaseConfig) -> Self {
        Self {
            pool,
            database: config.name.clone(),
            collection: config.users_collection.clone(),
        }
    }

    async fn users<T: Send + Sync>(&self) -> Result<Collection<T>, AccountError> {
        let client = self.pool.acquire().await?;
        Ok(client.database(&self.database).collection::<T>(&self.collection))
    }
}

#[async_trait]
impl AccountStore for MongoAccountStore {
    async fn onboarding_status(&self, email: &str) -> Result<Option<bool>, AccountError> {
        let users = self.users::<OnboardingProjection>().await?;
        let account = users
            .find_one(doc! { "email": email })
            .projection(doc! { "onboardingCompleted": 1, "_id": 0 })
            .await?;

        Ok(account.map(|a| a.onboarding_completed.unwrap_or(false)))
    }

    async fn set_onboarding_completed(&self, email: &str, completed: bool) -> Result<u64, AccountError> {
        let users = self.users::<Document>().await?;
        let result = users
            .update_one(
                doc! { "email": email },
                doc! { "$set": { "onboardingCompleted": completed } },
            )
            .await?;

        tracing::debug!(
            "Set onboardingCompleted={} for {} (matched {}, modified {})",
            completed,
            email,
            result.matched_count,
            result.modified_count
        );
        Ok(result.matched_count)
    }

    async fn ping(&self) -> Result<(), AccountError> {
        let client = self.pool.acquire().await?;
        client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
