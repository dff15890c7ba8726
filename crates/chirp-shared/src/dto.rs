//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to post a new tweet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTweetRequest {
    pub tweet_body: String,
    #[serde(default)]
    pub hash_tags: Vec<String>,
}

/// One tweet as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetResponse {
    pub tweet_id: String,
    pub tweet_body: String,
    pub hash_tags: Vec<String>,
    pub created_by: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

/// One page of tweets plus an optional continuation link.
///
/// `next_page` is present only when further results exist; it re-encodes
/// the original filters so that following it reproduces the same query one
/// window forward. Serialized as JSON `null` when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetsPageResponse {
    pub tweets: Vec<TweetResponse>,
    pub next_page: Option<String>,
}

impl TweetsPageResponse {
    pub fn new(tweets: Vec<TweetResponse>, next_page: Option<String>) -> Self {
        Self { tweets, next_page }
    }

    /// Build the continuation link for the window after `(offset, limit)`.
    ///
    /// The link carries the same `limit`, `offset + limit` as the next
    /// offset, and the original filter values as repeated query
    /// parameters. Filter values are percent-encoded; hashtags contain `#`,
    /// which would otherwise start a URL fragment.
    pub fn next_page_url(
        base_url: &str,
        limit: u64,
        offset: u64,
        hashtags: &[String],
        usernames: &[String],
    ) -> String {
        let mut url = format!(
            "{}/tweets?limit={}&offset={}",
            base_url.trim_end_matches('/'),
            limit,
            offset + limit
        );
        for tag in hashtags {
            url.push_str("&hashTag=");
            url.push_str(&urlencoding::encode(tag));
        }
        for name in usernames {
            url.push_str("&usernames=");
            url.push_str(&urlencoding::encode(name));
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_page_url_advances_offset_by_limit() {
        let url = TweetsPageResponse::next_page_url("http://localhost:8080", 50, 100, &[], &[]);
        assert_eq!(url, "http://localhost:8080/tweets?limit=50&offset=150");
    }

    #[test]
    fn next_page_url_reencodes_filters() {
        let hashtags = vec!["#go".to_string(), "#rust".to_string()];
        let usernames = vec!["alice".to_string()];
        let url =
            TweetsPageResponse::next_page_url("http://localhost:8080", 1, 0, &hashtags, &usernames);
        assert_eq!(
            url,
            "http://localhost:8080/tweets?limit=1&offset=1&hashTag=%23go&hashTag=%23rust&usernames=alice"
        );
    }

    #[test]
    fn next_page_url_tolerates_trailing_slash_in_base() {
        let url = TweetsPageResponse::next_page_url("http://localhost:8080/", 10, 0, &[], &[]);
        assert_eq!(url, "http://localhost:8080/tweets?limit=10&offset=10");
    }

    #[test]
    fn absent_next_page_serializes_as_null() {
        let page = TweetsPageResponse::new(vec![], None);
        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("nextPage").unwrap().is_null());
    }

    #[test]
    fn wire_names_are_camel_case() {
        let req: PostTweetRequest =
            serde_json::from_str(r##"{"tweetBody":"hi","hashTags":["#go"]}"##).unwrap();
        assert_eq!(req.tweet_body, "hi");
        assert_eq!(req.hash_tags, vec!["#go"]);

        // hashTags may be omitted entirely.
        let bare: PostTweetRequest = serde_json::from_str(r#"{"tweetBody":"hi"}"#).unwrap();
        assert!(bare.hash_tags.is_empty());
    }
}
