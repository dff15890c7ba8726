//! Tweet handlers: create, delete, and the filtered/paginated list.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use chirp_core::domain::{HashTag, PageRequest, Tweet};
use chirp_core::error::RepoError;
use chirp_core::ports::{HashTagRepository, Publisher, TweetRepository};
use chirp_core::validation;
use chirp_shared::dto::{PostTweetRequest, TweetResponse, TweetsPageResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Channel carrying a best-effort copy of every create request.
pub const TWEETS_CREATED_CHANNEL: &str = "tweets.created";

fn to_response(tweet: Tweet) -> TweetResponse {
    TweetResponse {
        tweet_id: tweet.id.to_string(),
        tweet_body: tweet.body,
        hash_tags: tweet.hashtags,
        created_by: tweet.username,
        created_at: tweet.created_at.to_rfc3339(),
    }
}

/// Resolve a tag text to its normalized row, creating it on first use.
///
/// Two requests creating the same brand-new tag race between lookup and
/// save. The loser's unique-constraint failure means the row exists now,
/// so look it up once more instead of failing the create.
async fn resolve_tag(state: &AppState, text: &str) -> Result<HashTag, AppError> {
    if let Some(existing) = state.hashtags.find_by_tag(text).await? {
        return Ok(existing);
    }
    match state.hashtags.save(HashTag::new(text.to_string())).await {
        Ok(saved) => Ok(saved),
        Err(RepoError::Constraint(_)) => state
            .hashtags
            .find_by_tag(text)
            .await?
            .ok_or_else(|| AppError::Internal("hash tag row vanished mid-create".to_string())),
        Err(e) => Err(e.into()),
    }
}

/// POST /tweets
pub async fn create_tweet(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<PostTweetRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate before touching the store - no partial writes on bad input.
    validation::validate_body(&req.tweet_body)?;
    validation::validate_create_hashtags(&req.hash_tags)?;

    // Resolve each tag to its normalized row, creating on first use.
    // Duplicates in the request collapse onto one row.
    let mut tags: Vec<HashTag> = Vec::new();
    for text in &req.hash_tags {
        if tags.iter().any(|t| &t.tag == text) {
            continue;
        }
        tags.push(resolve_tag(&state, text).await?);
    }

    let tweet = Tweet::new(
        identity.username,
        req.tweet_body.clone(),
        tags.iter().map(|t| t.tag.clone()).collect(),
    );
    let saved = state.tweets.create(tweet, &tags).await?;

    // Fire-and-forget: duplicate the raw request onto the notification
    // channel. Never awaited by the response path; failures are logged and
    // swallowed.
    match serde_json::to_string(&req) {
        Ok(payload) => {
            let publisher = state.publisher.clone();
            tokio::spawn(async move {
                if let Err(e) = publisher.publish(TWEETS_CREATED_CHANNEL, &payload).await {
                    tracing::warn!(error = %e, "Failed to publish create notification");
                }
            });
        }
        Err(e) => tracing::warn!(error = %e, "Failed to serialize create notification"),
    }

    Ok(HttpResponse::Created().json(to_response(saved)))
}

/// DELETE /tweets/{tweetId}
pub async fn delete_tweet(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let raw_id = path.into_inner();

    // An id that never existed and one that does not parse are the same
    // thing to the caller.
    let id = Uuid::parse_str(&raw_id)
        .map_err(|_| AppError::NotFound("Tweet not found.".to_string()))?;

    let tweet = state
        .tweets
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found.".to_string()))?;

    if !tweet.is_owned_by(&identity.username) {
        return Err(AppError::Forbidden);
    }

    state.tweets.delete(id).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Query parameters of the list endpoint. `hashTag` and `usernames` are
/// repeatable, so the raw pairs are folded by hand.
#[derive(Debug, Default)]
struct ListParams {
    hashtags: Vec<String>,
    usernames: Vec<String>,
    limit: i64,
    offset: i64,
}

impl ListParams {
    fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, AppError> {
        let mut params = ListParams {
            limit: 50,
            offset: 0,
            ..Default::default()
        };
        for (key, value) in pairs {
            match key.as_str() {
                "hashTag" => params.hashtags.push(value),
                "usernames" => params.usernames.push(value),
                "limit" => {
                    params.limit = value.parse().map_err(|_| AppError::InvalidRange)?;
                }
                "offset" => {
                    params.offset = value.parse().map_err(|_| AppError::InvalidRange)?;
                }
                // Unknown parameters are ignored.
                _ => {}
            }
        }
        Ok(params)
    }
}

/// GET /tweets
pub async fn list_tweets(
    _identity: Identity,
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
) -> AppResult<HttpResponse> {
    let params = ListParams::from_pairs(query.into_inner())?;

    validation::validate_page_bounds(params.limit, params.offset)?;
    for tag in &params.hashtags {
        validation::validate_hashtag(tag)?;
    }
    for name in &params.usernames {
        validation::validate_username(name)?;
    }

    let page_req = PageRequest::new(params.offset as u64, params.limit as u64);

    // Exactly one of four retrieval paths, picked by which filters are
    // present; first match wins.
    let page = if !params.hashtags.is_empty() && !params.usernames.is_empty() {
        state
            .tweets
            .page_by_hashtags_and_usernames(&params.hashtags, &params.usernames, page_req)
            .await?
    } else if !params.hashtags.is_empty() {
        state.tweets.page_by_hashtags(&params.hashtags, page_req).await?
    } else if !params.usernames.is_empty() {
        state
            .tweets
            .page_by_usernames(&params.usernames, page_req)
            .await?
    } else {
        state.tweets.page_all(page_req).await?
    };

    let next_page = page.has_next.then(|| {
        TweetsPageResponse::next_page_url(
            &state.base_url,
            page_req.limit,
            page_req.offset,
            &params.hashtags,
            &params.usernames,
        )
    });

    let tweets = page.items.into_iter().map(to_response).collect();
    Ok(HttpResponse::Ok().json(TweetsPageResponse::new(tweets, next_page)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use actix_web::{App, test, web};
    use async_trait::async_trait;
    use serde_json::json;

    use chirp_infra::database::InMemoryHashTagRepository;
    use chirp_infra::pubsub::InMemoryPublisher;
    use chirp_shared::response::codes;

    use super::*;

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .configure(crate::handlers::configure_routes),
            )
            .await
        };
    }

    fn memory_state() -> AppState {
        AppState::in_memory(
            "http://localhost:8080",
            Arc::new(InMemoryPublisher::default()),
        )
    }

    fn post_tweet(username: &str, body: &str, tags: &[&str]) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/tweets")
            .insert_header(("X-Username", username))
            .set_json(json!({ "tweetBody": body, "hashTags": tags }))
    }

    #[actix_web::test]
    async fn missing_identity_header_is_unauthenticated() {
        let app = test_app!(memory_state());

        let req = test::TestRequest::get().uri("/tweets").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["httpCode"], 401);
        assert_eq!(body["errorCode"], codes::UNAUTHENTICATED);
        assert_eq!(body["message"], "Username header is missing.");
    }

    #[actix_web::test]
    async fn create_echoes_the_persisted_tweet() {
        let app = test_app!(memory_state());

        let resp =
            test::call_service(&app, post_tweet("alice", "hello world", &["#go"]).to_request())
                .await;
        assert_eq!(resp.status(), 201);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["tweetBody"], "hello world");
        assert_eq!(body["createdBy"], "alice");
        assert_eq!(body["hashTags"], json!(["#go"]));
        assert!(Uuid::parse_str(body["tweetId"].as_str().unwrap()).is_ok());
    }

    #[actix_web::test]
    async fn create_collapses_duplicate_tags() {
        let app = test_app!(memory_state());

        let resp = test::call_service(
            &app,
            post_tweet("alice", "dup tags", &["#go", "#go"]).to_request(),
        )
        .await;
        assert_eq!(resp.status(), 201);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["hashTags"], json!(["#go"]));
    }

    /// Hash tag store whose first save loses a uniqueness race: the row
    /// becomes visible to lookups only through that failed save.
    struct ContestedTags {
        inner: InMemoryHashTagRepository,
        lost_once: AtomicBool,
    }

    #[async_trait]
    impl HashTagRepository for ContestedTags {
        async fn find_by_tag(&self, tag: &str) -> Result<Option<HashTag>, RepoError> {
            self.inner.find_by_tag(tag).await
        }

        async fn save(&self, tag: HashTag) -> Result<HashTag, RepoError> {
            if !self.lost_once.swap(true, Ordering::SeqCst) {
                self.inner.save(tag).await?;
                return Err(RepoError::Constraint("duplicate key value".to_string()));
            }
            self.inner.save(tag).await
        }
    }

    #[actix_web::test]
    async fn create_survives_losing_a_tag_uniqueness_race() {
        let mut state = memory_state();
        state.hashtags = Arc::new(ContestedTags {
            inner: InMemoryHashTagRepository::new(),
            lost_once: AtomicBool::new(false),
        });
        let app = test_app!(state);

        let resp =
            test::call_service(&app, post_tweet("alice", "first use", &["#go"]).to_request())
                .await;
        assert_eq!(resp.status(), 201);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["hashTags"], json!(["#go"]));
    }

    #[actix_web::test]
    async fn create_with_six_tags_is_rejected() {
        let state = memory_state();
        let app = test_app!(state.clone());

        let tags: Vec<String> = (0..6).map(|i| format!("#t{i}")).collect();
        let tag_refs: Vec<&str> = tags.iter().map(String::as_str).collect();
        let resp =
            test::call_service(&app, post_tweet("alice", "too many", &tag_refs).to_request())
                .await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errorCode"], codes::TOO_MANY_TAGS);

        // Nothing was persisted.
        let page = state.tweets.page_all(PageRequest::new(0, 50)).await.unwrap();
        assert!(page.items.is_empty());
    }

    #[actix_web::test]
    async fn create_with_malformed_tag_is_rejected() {
        let app = test_app!(memory_state());

        let resp =
            test::call_service(&app, post_tweet("alice", "bad tag", &["nohash"]).to_request())
                .await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errorCode"], codes::INVALID_FILTER);
    }

    #[actix_web::test]
    async fn create_with_empty_body_is_rejected() {
        let app = test_app!(memory_state());

        let resp = test::call_service(&app, post_tweet("alice", "", &[]).to_request()).await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errorCode"], codes::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn create_publishes_the_raw_request() {
        let publisher = Arc::new(InMemoryPublisher::default());
        let state = AppState::in_memory("http://localhost:8080", publisher.clone());
        let mut rx = publisher.subscribe(TWEETS_CREATED_CHANNEL).await;
        let app = test_app!(state);

        let resp =
            test::call_service(&app, post_tweet("alice", "notify me", &["#go"]).to_request())
                .await;
        assert_eq!(resp.status(), 201);

        let payload = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("publish within a second")
            .unwrap();
        let msg: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(msg["tweetBody"], "notify me");
        assert_eq!(msg["hashTags"], json!(["#go"]));
    }

    #[actix_web::test]
    async fn list_rejects_out_of_range_window() {
        let app = test_app!(memory_state());

        for uri in [
            "/tweets?limit=0",
            "/tweets?limit=101",
            "/tweets?offset=-1",
            "/tweets?limit=abc",
        ] {
            let req = test::TestRequest::get()
                .uri(uri)
                .insert_header(("X-Username", "reader"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 412, "uri: {uri}");

            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["errorCode"], codes::INVALID_RANGE);
        }
    }

    #[actix_web::test]
    async fn list_rejects_malformed_filters() {
        let app = test_app!(memory_state());

        // Unprefixed hashtag filter.
        let req = test::TestRequest::get()
            .uri("/tweets?hashTag=go")
            .insert_header(("X-Username", "reader"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        // Username with a hyphen.
        let req = test::TestRequest::get()
            .uri("/tweets?usernames=not-a-name")
            .insert_header(("X-Username", "reader"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errorCode"], codes::INVALID_FILTER);
    }

    #[actix_web::test]
    async fn list_filtered_by_author_round_trips_the_create() {
        let app = test_app!(memory_state());

        test::call_service(&app, post_tweet("alice", "mine", &["#go"]).to_request()).await;
        test::call_service(&app, post_tweet("bob", "his", &[]).to_request()).await;

        let req = test::TestRequest::get()
            .uri("/tweets?usernames=alice")
            .insert_header(("X-Username", "reader"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        let tweets = body["tweets"].as_array().unwrap();
        assert_eq!(tweets.len(), 1);
        assert_eq!(tweets[0]["createdBy"], "alice");
        assert_eq!(tweets[0]["tweetBody"], "mine");
        assert_eq!(tweets[0]["hashTags"], json!(["#go"]));
        assert!(body["nextPage"].is_null());
    }

    #[actix_web::test]
    async fn hashtag_pages_chain_through_next_page() {
        let app = test_app!(memory_state());

        test::call_service(&app, post_tweet("alice", "a", &["#go"]).to_request()).await;
        test::call_service(&app, post_tweet("bob", "b", &["#go", "#rust"]).to_request()).await;

        let req = test::TestRequest::get()
            .uri("/tweets?hashTag=%23go&limit=1&offset=0")
            .insert_header(("X-Username", "reader"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let first: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(first["tweets"].as_array().unwrap().len(), 1);
        let next = first["nextPage"].as_str().expect("next page link");
        assert_eq!(
            next,
            "http://localhost:8080/tweets?limit=1&offset=1&hashTag=%23go"
        );

        // Follow the link: same filter, one window forward.
        let (_, query) = next.split_once('?').unwrap();
        let req = test::TestRequest::get()
            .uri(&format!("/tweets?{query}"))
            .insert_header(("X-Username", "reader"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let second: serde_json::Value = test::read_body_json(resp).await;

        let first_body = first["tweets"][0]["tweetBody"].as_str().unwrap();
        let second_body = second["tweets"][0]["tweetBody"].as_str().unwrap();
        assert_ne!(first_body, second_body);
        assert!(second["nextPage"].is_null());
    }

    #[actix_web::test]
    async fn combined_filter_intersects_hashtags_and_usernames() {
        let app = test_app!(memory_state());

        test::call_service(&app, post_tweet("alice", "a", &["#go"]).to_request()).await;
        test::call_service(&app, post_tweet("bob", "b", &["#go"]).to_request()).await;
        test::call_service(&app, post_tweet("bob", "c", &["#rust"]).to_request()).await;

        let req = test::TestRequest::get()
            .uri("/tweets?hashTag=%23go&usernames=bob")
            .insert_header(("X-Username", "reader"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        let body: serde_json::Value = test::read_body_json(resp).await;
        let tweets = body["tweets"].as_array().unwrap();
        assert_eq!(tweets.len(), 1);
        assert_eq!(tweets[0]["tweetBody"], "b");
    }

    #[actix_web::test]
    async fn delete_unknown_id_is_not_found() {
        let app = test_app!(memory_state());

        // "999" is not a valid id and no tweet ever had it.
        let req = test::TestRequest::delete()
            .uri("/tweets/999")
            .insert_header(("X-Username", "alice"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errorCode"], codes::NOT_FOUND);
        assert_eq!(body["message"], "Tweet not found.");
    }

    #[actix_web::test]
    async fn delete_by_non_owner_is_forbidden_and_keeps_the_tweet() {
        let state = memory_state();
        let app = test_app!(state.clone());

        let resp =
            test::call_service(&app, post_tweet("alice", "keep me", &[]).to_request()).await;
        let created: serde_json::Value = test::read_body_json(resp).await;
        let id = created["tweetId"].as_str().unwrap().to_string();

        let req = test::TestRequest::delete()
            .uri(&format!("/tweets/{id}"))
            .insert_header(("X-Username", "mallory"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errorCode"], codes::FORBIDDEN);

        // Still retrievable.
        let found = state
            .tweets
            .find_by_id(Uuid::parse_str(&id).unwrap())
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[actix_web::test]
    async fn delete_by_owner_removes_the_tweet() {
        let state = memory_state();
        let app = test_app!(state.clone());

        let resp =
            test::call_service(&app, post_tweet("alice", "bye", &[]).to_request()).await;
        let created: serde_json::Value = test::read_body_json(resp).await;
        let id = created["tweetId"].as_str().unwrap().to_string();

        let req = test::TestRequest::delete()
            .uri(&format!("/tweets/{id}"))
            .insert_header(("X-Username", "alice"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        // Deleting again reports not found.
        let req = test::TestRequest::delete()
            .uri(&format!("/tweets/{id}"))
            .insert_header(("X-Username", "alice"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
