pub mod accounts;
pub mod mongo;
pub mod pool;

pub use accounts::{AccountError, AccountStore, MongoAccountStore, OnboardingProjection};
pub use mongo::{mongo_pool, MongoConnector, MongoPool};
pub use pool::{ConnectError, ConnectionPool, Connector};
