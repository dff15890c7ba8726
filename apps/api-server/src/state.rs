//! Application state - shared across all handlers.

use std::sync::Arc;

use chirp_core::ports::{HashTagRepository, Publisher, TweetRepository};
use chirp_infra::pubsub::InMemoryPublisher;
use chirp_infra::database::{InMemoryHashTagRepository, InMemoryTweetRepository};

#[cfg(feature = "postgres")]
use chirp_infra::database::{DatabaseConnection, PostgresHashTagRepository, PostgresTweetRepository};

#[cfg(feature = "redis")]
use chirp_infra::pubsub::RedisPublisher;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub tweets: Arc<dyn TweetRepository>,
    pub hashtags: Arc<dyn HashTagRepository>,
    pub publisher: Arc<dyn Publisher>,
    /// Base URL used when constructing next-page links.
    pub base_url: String,
    /// Which tweet store the server came up with ("postgres" or "memory").
    /// Surfaced by the health endpoint.
    pub store: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let (tweets, hashtags, store): (
            Arc<dyn TweetRepository>,
            Arc<dyn HashTagRepository>,
            &'static str,
        ) = {
            if let Some(db_config) = &config.database {
                match DatabaseConnection::init(db_config).await {
                    Ok(db) => (
                        Arc::new(PostgresTweetRepository::new(db.conn.clone())) as _,
                        Arc::new(PostgresHashTagRepository::new(db.conn)) as _,
                        "postgres",
                    ),
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        let (tweets, hashtags) = Self::memory_repos();
                        (tweets, hashtags, "memory")
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                let (tweets, hashtags) = Self::memory_repos();
                (tweets, hashtags, "memory")
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (tweets, hashtags, store) = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            let (tweets, hashtags) = Self::memory_repos();
            (tweets, hashtags, "memory")
        };

        #[cfg(feature = "redis")]
        let publisher: Arc<dyn Publisher> = {
            if config.redis_url.is_some() {
                match RedisPublisher::from_env().await {
                    Ok(publisher) => Arc::new(publisher),
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to Redis: {}. Using in-memory publisher.",
                            e
                        );
                        Arc::new(InMemoryPublisher::default())
                    }
                }
            } else {
                tracing::warn!("REDIS_URL not set. Using in-memory publisher.");
                Arc::new(InMemoryPublisher::default())
            }
        };

        #[cfg(not(feature = "redis"))]
        let publisher: Arc<dyn Publisher> = Arc::new(InMemoryPublisher::default());

        tracing::info!("Application state initialized");

        Self {
            tweets,
            hashtags,
            publisher,
            base_url: config.public_base_url.clone(),
            store,
        }
    }

    fn memory_repos() -> (Arc<dyn TweetRepository>, Arc<dyn HashTagRepository>) {
        (
            Arc::new(InMemoryTweetRepository::new()),
            Arc::new(InMemoryHashTagRepository::new()),
        )
    }

    /// Fully in-memory state. Used by tests.
    #[cfg(test)]
    pub fn in_memory(base_url: impl Into<String>, publisher: Arc<dyn Publisher>) -> Self {
        let (tweets, hashtags) = Self::memory_repos();
        Self {
            tweets,
            hashtags,
            publisher,
            base_url: base_url.into(),
            store: "memory",
        }
    }
}
