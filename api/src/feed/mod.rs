//! The post feed: keyset pagination plus per-request author batching.

mod assembly;
mod paginator;

pub use assembly::get_feed;
pub use paginator::{Cursor, FeedPaginator, MAX_PAGE_SIZE, Page};
