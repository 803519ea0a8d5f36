use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::ApiError;
use crate::models::Post;
use crate::store::PostStore;

/// Upper bound on page size, whatever the caller asks for.
pub const MAX_PAGE_SIZE: i32 = 20;

/// Opaque position in the feed: the creation time, in epoch milliseconds, of
/// the last post already seen.
pub struct Cursor;

impl Cursor {
    pub fn after(post: &Post) -> String {
        post.created_at.timestamp_millis().to_string()
    }

    pub fn parse(cursor: &str) -> Result<DateTime<Utc>, ApiError> {
        let millis: i64 = cursor
            .parse()
            .map_err(|_| ApiError::InvalidCursor(cursor.to_string()))?;

        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| ApiError::InvalidCursor(cursor.to_string()))
    }
}

#[derive(Debug)]
pub struct Page {
    pub items: Vec<Post>,
    pub has_more: bool,
}

/// Keyset pagination over posts, newest first.
pub struct FeedPaginator<'a> {
    posts: &'a dyn PostStore,
}

impl<'a> FeedPaginator<'a> {
    pub fn new(posts: &'a dyn PostStore) -> Self {
        Self { posts }
    }

    /// Fetches one row past the page to learn whether another page exists.
    /// An empty cursor is the first page.
    pub async fn fetch_page(&self, limit: i32, cursor: Option<&str>) -> Result<Page, ApiError> {
        let limit = limit.clamp(0, MAX_PAGE_SIZE) as usize;
        let before = match cursor {
            Some(cursor) if !cursor.is_empty() => Some(Cursor::parse(cursor)?),
            _ => None,
        };

        let mut items = self.posts.recent_posts(limit + 1, before).await?;
        let has_more = items.len() > limit;
        items.truncate(limit);

        debug!(
            "Fetched feed page: {} posts, has_more={}, before={:?}",
            items.len(),
            has_more,
            before
        );

        Ok(Page { items, has_more })
    }
}
