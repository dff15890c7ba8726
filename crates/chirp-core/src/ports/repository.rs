use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{HashTag, Page, PageRequest, Tweet};
use crate::error::RepoError;

/// Tweet repository.
///
/// The four paged queries are the four retrieval paths the list endpoint
/// routes between; they share a single pagination convention (item offset,
/// ascending creation time) and report whether results exist beyond the
/// returned window.
#[async_trait]
pub trait TweetRepository: Send + Sync {
    /// Find a tweet by its id, tags included.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tweet>, RepoError>;

    /// Persist a new tweet together with its tag associations.
    ///
    /// `tags` are the already-resolved tag rows for `tweet.hashtags`.
    async fn create(&self, tweet: Tweet, tags: &[HashTag]) -> Result<Tweet, RepoError>;

    /// Remove a tweet and its tag associations. The tag rows themselves
    /// survive.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// All tweets, paged.
    async fn page_all(&self, page: PageRequest) -> Result<Page<Tweet>, RepoError>;

    /// Tweets carrying any of the given hashtags.
    async fn page_by_hashtags(
        &self,
        hashtags: &[String],
        page: PageRequest,
    ) -> Result<Page<Tweet>, RepoError>;

    /// Tweets authored by any of the given usernames.
    async fn page_by_usernames(
        &self,
        usernames: &[String],
        page: PageRequest,
    ) -> Result<Page<Tweet>, RepoError>;

    /// Tweets carrying any of the given hashtags AND authored by any of the
    /// given usernames.
    async fn page_by_hashtags_and_usernames(
        &self,
        hashtags: &[String],
        usernames: &[String],
        page: PageRequest,
    ) -> Result<Page<Tweet>, RepoError>;
}

/// HashTag repository - normalized tag rows, unique by text.
#[async_trait]
pub trait HashTagRepository: Send + Sync {
    /// Look up a tag row by its exact text.
    async fn find_by_tag(&self, tag: &str) -> Result<Option<HashTag>, RepoError>;

    /// Persist a new tag row.
    async fn save(&self, tag: HashTag) -> Result<HashTag, RepoError>;
}
