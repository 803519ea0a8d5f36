use async_graphql::{Context, Object, Result as GraphQLResult};
use tracing::info;

use super::{graphql_error, request_parts, require_viewer};
use crate::context::RequestContext;
use crate::dto::{FeedResponse, PostInput, PostResponse, PostView, field_errors};
use crate::errors::ApiError;
use crate::feed::get_feed;
use crate::models::{NewPost, Post};
use crate::states::AppState;

async fn render(
    state: &AppState,
    request: &RequestContext,
    post: &Post,
) -> Result<PostView, ApiError> {
    let author = request.users.load(post.author_id).await?;
    Ok(PostView::render(post, author.as_deref(), request.viewer, &state.assets))
}

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// Newest posts first. `limit` is capped at 20; pass the `createdAt` of
    /// the last post received as `cursor` to continue.
    async fn feed(
        &self,
        ctx: &Context<'_>,
        limit: i32,
        cursor: Option<String>,
    ) -> GraphQLResult<FeedResponse> {
        let (state, request) = request_parts(ctx)?;

        get_feed(
            state.posts.as_ref(),
            &state.assets,
            request,
            limit,
            cursor.as_deref(),
        )
        .await
        .map_err(graphql_error)
    }

    async fn post(&self, ctx: &Context<'_>, id: i32) -> GraphQLResult<Option<PostView>> {
        let (state, request) = request_parts(ctx)?;

        let Some(post) = state.posts.post_by_id(id).await.map_err(graphql_error)? else {
            return Ok(None);
        };

        render(state, request, &post)
            .await
            .map(Some)
            .map_err(graphql_error)
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        input: PostInput,
    ) -> GraphQLResult<PostResponse> {
        let (state, request) = request_parts(ctx)?;
        let author_id = require_viewer(request)?;

        if let Some(errors) = field_errors(&input) {
            return Ok(PostResponse {
                errors: Some(errors),
                post: None,
            });
        }

        let post = state
            .posts
            .insert_post(NewPost {
                title: input.title,
                description: Some(input.description),
                body: input.body,
                author_id,
            })
            .await
            .map_err(graphql_error)?;

        info!("Post created: {} by user {}", post.id, author_id);

        let view = render(state, request, &post).await.map_err(graphql_error)?;
        Ok(PostResponse {
            errors: None,
            post: Some(view),
        })
    }

    /// Title-only update by the post's author. `null` if the post is gone.
    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: i32,
        title: Option<String>,
    ) -> GraphQLResult<Option<PostView>> {
        let (state, request) = request_parts(ctx)?;
        let viewer = require_viewer(request)?;

        let Some(post) = state.posts.post_by_id(id).await.map_err(graphql_error)? else {
            return Ok(None);
        };
        if post.author_id != viewer {
            return Err(graphql_error(ApiError::Forbidden));
        }

        let post = match title {
            Some(title) => state
                .posts
                .update_post_title(id, title)
                .await
                .map_err(graphql_error)?,
            None => Some(post),
        };
        let Some(post) = post else {
            return Ok(None);
        };

        info!("Post updated: {} by user {}", post.id, viewer);

        render(state, request, &post)
            .await
            .map(Some)
            .map_err(graphql_error)
    }

    /// `false` when there was nothing to delete.
    async fn delete_post(&self, ctx: &Context<'_>, id: i32) -> GraphQLResult<bool> {
        let (state, request) = request_parts(ctx)?;
        let viewer = require_viewer(request)?;

        let Some(post) = state.posts.post_by_id(id).await.map_err(graphql_error)? else {
            return Ok(false);
        };
        // Check ownership
        if post.author_id != viewer {
            return Err(graphql_error(ApiError::Forbidden));
        }

        let deleted = state.posts.delete_post(id).await.map_err(graphql_error)?;
        if deleted {
            info!("Post deleted: {} by user {}", id, viewer);
        }

        Ok(deleted)
    }
}
