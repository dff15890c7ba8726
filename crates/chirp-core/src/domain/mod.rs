//! Domain entities - the core business objects.

mod hashtag;
mod page;
mod tweet;

pub use hashtag::HashTag;
pub use page::{Page, PageRequest};
pub use tweet::Tweet;
