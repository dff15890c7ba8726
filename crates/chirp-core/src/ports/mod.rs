//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod publisher;
mod repository;

pub use publisher::{PublishError, Publisher};
pub use repository::{HashTagRepository, TweetRepository};
