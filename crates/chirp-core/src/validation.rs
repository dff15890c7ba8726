//! Request validation - pure predicate checks, performed before any store
//! access so that invalid input never causes a partial write.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::DomainError;

/// Canonical hashtag pattern. The `#` prefix is part of the tag text.
static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^#[A-Za-z0-9_]*$").expect("hashtag regex"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z0-9_]*$").expect("username regex"));

/// Matches the `hashtags.tag` column width.
pub const MAX_HASHTAG_LEN: usize = 20;

/// Maximum number of hashtags on a single tweet.
pub const MAX_HASHTAGS_PER_TWEET: usize = 5;

/// Inclusive bounds for the `limit` query parameter.
pub const LIMIT_RANGE: std::ops::RangeInclusive<i64> = 1..=100;

/// Check the pagination window: `limit` in `[1,100]`, `offset >= 0`.
pub fn validate_page_bounds(limit: i64, offset: i64) -> Result<(), DomainError> {
    if !LIMIT_RANGE.contains(&limit) || offset < 0 {
        return Err(DomainError::InvalidRange);
    }
    Ok(())
}

/// Check a single hashtag value against the canonical pattern.
pub fn validate_hashtag(tag: &str) -> Result<(), DomainError> {
    if tag.len() > MAX_HASHTAG_LEN || !HASHTAG_RE.is_match(tag) {
        return Err(DomainError::InvalidFilter(format!(
            "Invalid hash tag: {tag}"
        )));
    }
    Ok(())
}

/// Check a single username filter value.
pub fn validate_username(name: &str) -> Result<(), DomainError> {
    if !USERNAME_RE.is_match(name) {
        return Err(DomainError::InvalidFilter(format!(
            "Invalid username: {name}"
        )));
    }
    Ok(())
}

/// Validate the hashtag list of a create request: at most five tags, each
/// matching the canonical pattern.
pub fn validate_create_hashtags(tags: &[String]) -> Result<(), DomainError> {
    if tags.len() > MAX_HASHTAGS_PER_TWEET {
        return Err(DomainError::TooManyTags);
    }
    for tag in tags {
        validate_hashtag(tag)?;
    }
    Ok(())
}

/// Tweet body must be present.
pub fn validate_body(body: &str) -> Result<(), DomainError> {
    if body.is_empty() {
        return Err(DomainError::Validation(
            "Tweet body must not be empty".to_string(),
        ));
    }
    Ok(())
}
