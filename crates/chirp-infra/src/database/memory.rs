//! In-memory repository implementations.
//!
//! Used when no database is configured and as the backing store for
//! handler-level tests. Works within a single process only.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use chirp_core::domain::{HashTag, Page, PageRequest, Tweet};
use chirp_core::error::RepoError;
use chirp_core::ports::{HashTagRepository, TweetRepository};

/// In-memory tweet store.
#[derive(Default)]
pub struct InMemoryTweetRepository {
    tweets: RwLock<Vec<Tweet>>,
}

impl InMemoryTweetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the shared pagination convention to a filtered snapshot.
    fn paginate(mut matched: Vec<Tweet>, page: PageRequest) -> Page<Tweet> {
        matched.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        let window: Vec<Tweet> = matched
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize + 1)
            .collect();
        Page::from_overfetch(window, page.limit)
    }
}

fn matches_any_hashtag(tweet: &Tweet, hashtags: &[String]) -> bool {
    tweet.hashtags.iter().any(|t| hashtags.contains(t))
}

fn matches_any_username(tweet: &Tweet, usernames: &[String]) -> bool {
    usernames.iter().any(|u| *u == tweet.username)
}

#[async_trait]
impl TweetRepository for InMemoryTweetRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tweet>, RepoError> {
        let tweets = self.tweets.read().await;
        Ok(tweets.iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, tweet: Tweet, _tags: &[HashTag]) -> Result<Tweet, RepoError> {
        let mut tweets = self.tweets.write().await;
        if tweets.iter().any(|t| t.id == tweet.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tweets.push(tweet.clone());
        Ok(tweet)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tweets = self.tweets.write().await;
        let before = tweets.len();
        tweets.retain(|t| t.id != id);
        if tweets.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn page_all(&self, page: PageRequest) -> Result<Page<Tweet>, RepoError> {
        let tweets = self.tweets.read().await;
        Ok(Self::paginate(tweets.clone(), page))
    }

    async fn page_by_hashtags(
        &self,
        hashtags: &[String],
        page: PageRequest,
    ) -> Result<Page<Tweet>, RepoError> {
        let tweets = self.tweets.read().await;
        let matched = tweets
            .iter()
            .filter(|t| matches_any_hashtag(t, hashtags))
            .cloned()
            .collect();
        Ok(Self::paginate(matched, page))
    }

    async fn page_by_usernames(
        &self,
        usernames: &[String],
        page: PageRequest,
    ) -> Result<Page<Tweet>, RepoError> {
        let tweets = self.tweets.read().await;
        let matched = tweets
            .iter()
            .filter(|t| matches_any_username(t, usernames))
            .cloned()
            .collect();
        Ok(Self::paginate(matched, page))
    }

    async fn page_by_hashtags_and_usernames(
        &self,
        hashtags: &[String],
        usernames: &[String],
        page: PageRequest,
    ) -> Result<Page<Tweet>, RepoError> {
        let tweets = self.tweets.read().await;
        let matched = tweets
            .iter()
            .filter(|t| matches_any_hashtag(t, hashtags) && matches_any_username(t, usernames))
            .cloned()
            .collect();
        Ok(Self::paginate(matched, page))
    }
}

/// In-memory hashtag store with tag-text uniqueness.
#[derive(Default)]
pub struct InMemoryHashTagRepository {
    tags: RwLock<Vec<HashTag>>,
}

impl InMemoryHashTagRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HashTagRepository for InMemoryHashTagRepository {
    async fn find_by_tag(&self, tag: &str) -> Result<Option<HashTag>, RepoError> {
        let tags = self.tags.read().await;
        Ok(tags.iter().find(|t| t.tag == tag).cloned())
    }

    async fn save(&self, tag: HashTag) -> Result<HashTag, RepoError> {
        let mut tags = self.tags.write().await;
        if tags.iter().any(|t| t.tag == tag.tag) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tags.push(tag.clone());
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tweet(username: &str, body: &str, hashtags: &[&str]) -> Tweet {
        Tweet::new(
            username.to_string(),
            body.to_string(),
            hashtags.iter().map(|t| t.to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let repo = InMemoryTweetRepository::new();
        let t = tweet("alice", "hello", &["#go"]);
        let saved = repo.create(t.clone(), &[]).await.unwrap();
        assert_eq!(saved.id, t.id);

        let found = repo.find_by_id(t.id).await.unwrap().unwrap();
        assert_eq!(found.username, "alice");
        assert_eq!(found.body, "hello");
        assert_eq!(found.hashtags, vec!["#go"]);
    }

    #[tokio::test]
    async fn delete_removes_the_tweet() {
        let repo = InMemoryTweetRepository::new();
        let t = tweet("alice", "hello", &[]);
        repo.create(t.clone(), &[]).await.unwrap();

        repo.delete(t.id).await.unwrap();
        assert!(repo.find_by_id(t.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(t.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn hashtag_filter_matches_any_given_tag() {
        let repo = InMemoryTweetRepository::new();
        repo.create(tweet("alice", "a", &["#go"]), &[]).await.unwrap();
        repo.create(tweet("bob", "b", &["#go", "#rust"]), &[])
            .await
            .unwrap();
        repo.create(tweet("carol", "c", &["#java"]), &[])
            .await
            .unwrap();

        let page = repo
            .page_by_hashtags(&["#go".to_string()], PageRequest::new(0, 50))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn combined_filter_intersects_predicates() {
        let repo = InMemoryTweetRepository::new();
        repo.create(tweet("alice", "a", &["#go"]), &[]).await.unwrap();
        repo.create(tweet("bob", "b", &["#go", "#rust"]), &[])
            .await
            .unwrap();

        let page = repo
            .page_by_hashtags_and_usernames(
                &["#go".to_string()],
                &["bob".to_string()],
                PageRequest::new(0, 50),
            )
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].username, "bob");
    }

    #[tokio::test]
    async fn windows_are_disjoint_and_exhaustive() {
        let repo = InMemoryTweetRepository::new();
        repo.create(tweet("alice", "a", &["#go"]), &[]).await.unwrap();
        repo.create(tweet("bob", "b", &["#go", "#rust"]), &[])
            .await
            .unwrap();

        let first = repo
            .page_by_hashtags(&["#go".to_string()], PageRequest::new(0, 1))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 1);
        assert!(first.has_next);

        let second = repo
            .page_by_hashtags(&["#go".to_string()], PageRequest::new(1, 1))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(!second.has_next);

        assert_ne!(first.items[0].id, second.items[0].id);
    }

    #[tokio::test]
    async fn offset_beyond_data_yields_empty_final_page() {
        let repo = InMemoryTweetRepository::new();
        repo.create(tweet("alice", "a", &[]), &[]).await.unwrap();

        let page = repo.page_all(PageRequest::new(10, 5)).await.unwrap();
        assert!(page.items.is_empty());
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn tag_texts_are_unique() {
        let repo = InMemoryHashTagRepository::new();
        repo.save(HashTag::new("#go".to_string())).await.unwrap();

        assert!(matches!(
            repo.save(HashTag::new("#go".to_string())).await,
            Err(RepoError::Constraint(_))
        ));

        let found = repo.find_by_tag("#go").await.unwrap().unwrap();
        assert_eq!(found.tag, "#go");
        assert!(repo.find_by_tag("#rust").await.unwrap().is_none());
    }
}
