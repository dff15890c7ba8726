//! # Chirp Shared
//!
//! Wire types shared between the server and any client: request/response
//! DTOs, the page envelope with its next-page link, and the error body.

pub mod dto;
pub mod response;

pub use response::ErrorBody;
