//! # Chirp Infrastructure
//!
//! Concrete implementations of the ports defined in `chirp-core`.
//! This crate contains database and notification-channel integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL repositories via SeaORM
//! - `redis` - Redis-backed notification publisher

pub mod database;
pub mod pubsub;

// Re-exports - In-Memory
pub use database::{InMemoryHashTagRepository, InMemoryTweetRepository};
pub use pubsub::InMemoryPublisher;

// Re-exports - Postgres
pub use database::DatabaseConfig;
#[cfg(feature = "postgres")]
pub use database::{DatabaseConnection, PostgresHashTagRepository, PostgresTweetRepository};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use pubsub::{RedisConfig, RedisPublisher};
