//! Storage collaborators.
//!
//! The feed and the loader only talk to these traits. `MemoryStore` is the
//! bundled implementation; a relational backend plugs in behind the same
//! seams.

mod memory;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{NewPost, NewUser, Post, User};

pub use memory::MemoryStore;

/// Failures reported by a storage backend.
///
/// `Clone` because one failed bulk fetch is handed to every caller waiting on
/// that batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("unique constraint violated on {0}")]
    UniqueViolation(&'static str),
}

/// Post storage.
///
/// The feed cursor carries only a millisecond `created_at`, so an
/// implementation must give every post a distinct `created_at` at millisecond
/// precision. Rows sharing a millisecond would be skipped when a page boundary
/// falls between them.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Up to `take` posts, newest first, optionally restricted to
    /// `created_at < before`.
    async fn recent_posts(
        &self,
        take: usize,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Post>, StoreError>;

    async fn post_by_id(&self, id: i32) -> Result<Option<Post>, StoreError>;

    async fn insert_post(&self, new: NewPost) -> Result<Post, StoreError>;

    /// Returns `None` when no post has this id.
    async fn update_post_title(&self, id: i32, title: String)
    -> Result<Option<Post>, StoreError>;

    /// Returns whether a row was removed.
    async fn delete_post(&self, id: i32) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Bulk fetch. Unknown ids are skipped; order of the result is unspecified.
    async fn users_by_ids(&self, ids: &[i32]) -> Result<Vec<User>, StoreError>;

    async fn user_by_id(&self, id: i32) -> Result<Option<User>, StoreError>;

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with `UniqueViolation` if the username or email is taken.
    async fn insert_user(&self, new: NewUser) -> Result<User, StoreError>;
}
