use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};

use crate::models::{Post, User};
use crate::visibility::{self, AssetUrls};

/// A validation failure reported as data rather than as a request error.
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Timestamps go out as decimal epoch milliseconds, the same form the feed
/// cursor takes.
fn millis(at: &DateTime<Utc>) -> String {
    at.timestamp_millis().to_string()
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User")]
pub struct UserView {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub avatar_url: String,
    pub created_at: String,
    pub updated_at: String,
}

impl UserView {
    pub fn render(user: &User, viewer: Option<i32>, assets: &AssetUrls) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: visibility::user_email(user, viewer),
            avatar_url: assets.user_avatar(user),
            created_at: millis(&user.created_at),
            updated_at: millis(&user.updated_at),
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Post")]
pub struct PostView {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub cover: String,
    pub body: String,
    pub points: i32,
    pub author: Option<UserView>,
    pub created_at: String,
    pub updated_at: String,
}

impl PostView {
    pub fn render(
        post: &Post,
        author: Option<&User>,
        viewer: Option<i32>,
        assets: &AssetUrls,
    ) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            description: post.description.clone(),
            cover: assets.post_cover(post),
            body: visibility::post_body(post, viewer),
            points: post.points,
            author: author.map(|user| UserView::render(user, viewer, assets)),
            created_at: millis(&post.created_at),
            updated_at: millis(&post.updated_at),
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "PaginatedPosts")]
pub struct FeedResponse {
    pub posts: Vec<PostView>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, SimpleObject)]
pub struct PostResponse {
    pub errors: Option<Vec<FieldError>>,
    pub post: Option<PostView>,
}

#[derive(Debug, Clone, Default, SimpleObject)]
pub struct UserResponse {
    pub errors: Option<Vec<FieldError>>,
    pub user: Option<UserView>,
    /// Bearer token for subsequent requests, set on success.
    pub token: Option<String>,
}

impl UserResponse {
    pub fn error(field: &str, message: &str) -> Self {
        Self {
            errors: Some(vec![FieldError::new(field, message)]),
            ..Self::default()
        }
    }
}
