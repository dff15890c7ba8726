//! SeaORM entities for the chirp schema.

pub mod hashtag;
pub mod tweet;
pub mod tweet_hashtag;
