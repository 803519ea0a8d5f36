use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

use super::paginator::FeedPaginator;
use crate::context::RequestContext;
use crate::dto::{FeedResponse, PostView};
use crate::errors::ApiError;
use crate::store::PostStore;
use crate::visibility::AssetUrls;

/// Builds one page of the feed as the viewer in `ctx` may see it.
///
/// Authors of the whole page are resolved by a single `load_many`, never one
/// lookup per post.
pub async fn get_feed(
    posts: &dyn PostStore,
    assets: &AssetUrls,
    ctx: &RequestContext,
    limit: i32,
    cursor: Option<&str>,
) -> Result<FeedResponse, ApiError> {
    let page = FeedPaginator::new(posts).fetch_page(limit, cursor).await?;

    let mut seen = HashSet::new();
    let author_ids: Vec<i32> = page
        .items
        .iter()
        .map(|post| post.author_id)
        .filter(|id| seen.insert(*id))
        .collect();

    let loaded = ctx.users.load_many(&author_ids).await?;
    let authors: HashMap<i32, _> = author_ids
        .iter()
        .zip(loaded)
        .filter_map(|(id, user)| user.map(|user| (*id, user)))
        .collect();

    let posts = page
        .items
        .iter()
        .map(|post| {
            let author = authors.get(&post.author_id);
            if author.is_none() {
                warn!("Post {} references missing author {}", post.id, post.author_id);
            }
            PostView::render(post, author.map(Arc::as_ref), ctx.viewer, assets)
        })
        .collect();

    Ok(FeedResponse {
        posts,
        has_more: page.has_more,
    })
}
