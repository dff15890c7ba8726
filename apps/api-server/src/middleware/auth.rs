//! Identity extractor.
//!
//! The caller's identity is the opaque `X-Username` header. It is not
//! verified; presence and non-emptiness is all this service requires.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use std::future::{Ready, ready};

use crate::middleware::error::AppError;

/// Request header carrying the caller identity.
pub const USERNAME_HEADER: &str = "X-Username";

/// Caller identity extractor.
///
/// Use this in handlers to require an identity header:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let username = req
            .headers()
            .get(USERNAME_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if username.is_empty() {
            return ready(Err(AppError::Unauthenticated));
        }

        ready(Ok(Identity {
            username: username.to_string(),
        }))
    }
}
