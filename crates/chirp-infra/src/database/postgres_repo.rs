//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use chirp_core::domain::{HashTag, Page, PageRequest, Tweet};
use chirp_core::error::RepoError;
use chirp_core::ports::{HashTagRepository, TweetRepository};

use super::entity::hashtag::{self, Entity as HashTagEntity};
use super::entity::tweet::{self, Entity as TweetEntity};
use super::entity::tweet_hashtag::{self, Entity as TweetHashtagEntity};

fn query_err(e: sea_orm::DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

fn save_err(e: sea_orm::DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("Entity already exists".to_string())
    } else {
        RepoError::Query(err_str)
    }
}

/// PostgreSQL tweet repository.
pub struct PostgresTweetRepository {
    db: DbConn,
}

impl PostgresTweetRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Base select used by every list path: the store's natural order is
    /// ascending creation time, tie-broken by id.
    fn ordered() -> sea_orm::Select<TweetEntity> {
        TweetEntity::find()
            .order_by_asc(tweet::Column::CreatedAt)
            .order_by_asc(tweet::Column::Id)
    }

    /// Run a windowed query, over-fetching one row to detect a next page,
    /// then attach tags.
    async fn fetch_page(
        &self,
        select: sea_orm::Select<TweetEntity>,
        page: PageRequest,
    ) -> Result<Page<Tweet>, RepoError> {
        let rows = select
            .offset(page.offset)
            .limit(page.limit + 1)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        let mut tags = self.load_tags(&rows).await?;
        let tweets: Vec<Tweet> = rows
            .into_iter()
            .map(|row| {
                let hashtags = tags.remove(&row.id).unwrap_or_default();
                to_domain(row, hashtags)
            })
            .collect();

        Ok(Page::from_overfetch(tweets, page.limit))
    }

    /// Load the tag texts for a batch of tweet rows, keyed by tweet id.
    async fn load_tags(
        &self,
        rows: &[tweet::Model],
    ) -> Result<HashMap<Uuid, Vec<String>>, RepoError> {
        if rows.is_empty() {
            return Ok(HashMap::new());
        }

        let tweet_ids: Vec<Uuid> = rows.iter().map(|m| m.id).collect();
        let links = TweetHashtagEntity::find()
            .filter(tweet_hashtag::Column::TweetId.is_in(tweet_ids))
            .all(&self.db)
            .await
            .map_err(query_err)?;

        if links.is_empty() {
            return Ok(HashMap::new());
        }

        let tag_ids: Vec<Uuid> = links.iter().map(|l| l.hashtag_id).collect();
        let tag_rows = HashTagEntity::find()
            .filter(hashtag::Column::Id.is_in(tag_ids))
            .all(&self.db)
            .await
            .map_err(query_err)?;
        let texts: HashMap<Uuid, String> =
            tag_rows.into_iter().map(|t| (t.id, t.tag)).collect();

        let mut by_tweet: HashMap<Uuid, Vec<String>> = HashMap::new();
        for link in links {
            if let Some(text) = texts.get(&link.hashtag_id) {
                by_tweet
                    .entry(link.tweet_id)
                    .or_default()
                    .push(text.clone());
            }
        }
        for tags in by_tweet.values_mut() {
            tags.sort();
        }

        Ok(by_tweet)
    }
}

fn to_domain(model: tweet::Model, hashtags: Vec<String>) -> Tweet {
    Tweet {
        id: model.id,
        username: model.username,
        body: model.body,
        hashtags,
        created_at: model.created_at.into(),
    }
}

#[async_trait]
impl TweetRepository for PostgresTweetRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tweet>, RepoError> {
        let row = TweetEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut tags = self.load_tags(std::slice::from_ref(&row)).await?;
        let hashtags = tags.remove(&row.id).unwrap_or_default();
        Ok(Some(to_domain(row, hashtags)))
    }

    async fn create(&self, tweet: Tweet, tags: &[HashTag]) -> Result<Tweet, RepoError> {
        let txn = self.db.begin().await.map_err(query_err)?;

        tweet::ActiveModel {
            id: Set(tweet.id),
            username: Set(tweet.username.clone()),
            body: Set(tweet.body.clone()),
            created_at: Set(tweet.created_at.into()),
        }
        .insert(&txn)
        .await
        .map_err(save_err)?;

        for tag in tags {
            tweet_hashtag::ActiveModel {
                tweet_id: Set(tweet.id),
                hashtag_id: Set(tag.id),
            }
            .insert(&txn)
            .await
            .map_err(save_err)?;
        }

        txn.commit().await.map_err(query_err)?;
        Ok(tweet)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // Join rows go with the tweet via ON DELETE CASCADE; the tag rows
        // themselves survive.
        let result = TweetEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn page_all(&self, page: PageRequest) -> Result<Page<Tweet>, RepoError> {
        self.fetch_page(Self::ordered(), page).await
    }

    async fn page_by_hashtags(
        &self,
        hashtags: &[String],
        page: PageRequest,
    ) -> Result<Page<Tweet>, RepoError> {
        let select = Self::ordered()
            .join(JoinType::InnerJoin, tweet::Relation::TweetHashtag.def())
            .join(JoinType::InnerJoin, tweet_hashtag::Relation::Hashtag.def())
            .filter(hashtag::Column::Tag.is_in(hashtags.iter().map(String::as_str)))
            .distinct();
        self.fetch_page(select, page).await
    }

    async fn page_by_usernames(
        &self,
        usernames: &[String],
        page: PageRequest,
    ) -> Result<Page<Tweet>, RepoError> {
        let select = Self::ordered()
            .filter(tweet::Column::Username.is_in(usernames.iter().map(String::as_str)));
        self.fetch_page(select, page).await
    }

    async fn page_by_hashtags_and_usernames(
        &self,
        hashtags: &[String],
        usernames: &[String],
        page: PageRequest,
    ) -> Result<Page<Tweet>, RepoError> {
        let select = Self::ordered()
            .join(JoinType::InnerJoin, tweet::Relation::TweetHashtag.def())
            .join(JoinType::InnerJoin, tweet_hashtag::Relation::Hashtag.def())
            .filter(hashtag::Column::Tag.is_in(hashtags.iter().map(String::as_str)))
            .filter(tweet::Column::Username.is_in(usernames.iter().map(String::as_str)))
            .distinct();
        self.fetch_page(select, page).await
    }
}

/// PostgreSQL hashtag repository.
pub struct PostgresHashTagRepository {
    db: DbConn,
}

impl PostgresHashTagRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HashTagRepository for PostgresHashTagRepository {
    async fn find_by_tag(&self, tag: &str) -> Result<Option<HashTag>, RepoError> {
        let row = HashTagEntity::find()
            .filter(hashtag::Column::Tag.eq(tag))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(row.map(Into::into))
    }

    async fn save(&self, tag: HashTag) -> Result<HashTag, RepoError> {
        let row = hashtag::ActiveModel {
            id: Set(tag.id),
            tag: Set(tag.tag.clone()),
        }
        .insert(&self.db)
        .await
        .map_err(save_err)?;

        Ok(row.into())
    }
}
