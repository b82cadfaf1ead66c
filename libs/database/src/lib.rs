//! Database connectors for the catalog services.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client configuration, connection with retry, health checks
//! - `config` - `core_config::FromEnv` support for the connection settings
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "catalog");
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
