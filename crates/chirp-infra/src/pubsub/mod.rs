//! Notification publisher implementations.

mod memory;

pub use memory::InMemoryPublisher;

#[cfg(feature = "redis")]
mod redis;
#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisPublisher};
