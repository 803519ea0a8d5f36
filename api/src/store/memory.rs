use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{DashMap, mapref::entry::Entry};
use std::sync::atomic::{AtomicI32, AtomicI64, Ordering};

use super::{PostStore, StoreError, UserStore};
use crate::models::{NewPost, NewUser, Post, User};

/// In-process store backed by concurrent maps.
///
/// Timestamps are issued at millisecond precision, the same precision the
/// feed cursor carries, and every issued timestamp is strictly later than the
/// previous one.
#[derive(Default)]
pub struct MemoryStore {
    posts: DashMap<i32, Post>,
    users: DashMap<i32, User>,
    username_index: DashMap<String, i32>,
    email_index: DashMap<String, i32>,
    next_post_id: AtomicI32,
    next_user_id: AtomicI32,
    last_millis: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now().timestamp_millis();
        let millis = match self
            .last_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            }) {
            Ok(last) | Err(last) => now.max(last + 1),
        };
        DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
    }

    #[cfg(test)]
    pub(crate) fn put_post(&self, post: Post) {
        self.posts.insert(post.id, post);
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn recent_posts(
        &self,
        take: usize,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Post>, StoreError> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|entry| before.is_none_or(|cursor| entry.created_at < cursor))
            .map(|entry| entry.value().clone())
            .collect();

        // Newest first, id breaks timestamp ties
        posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        posts.truncate(take);

        Ok(posts)
    }

    async fn post_by_id(&self, id: i32) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.get(&id).map(|post| post.clone()))
    }

    async fn insert_post(&self, new: NewPost) -> Result<Post, StoreError> {
        let now = self.next_timestamp();
        let post = Post {
            id: self.next_post_id.fetch_add(1, Ordering::SeqCst) + 1,
            title: new.title,
            description: new.description,
            cover: None,
            body: new.body,
            points: 0,
            author_id: new.author_id,
            created_at: now,
            updated_at: now,
        };

        self.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_post_title(
        &self,
        id: i32,
        title: String,
    ) -> Result<Option<Post>, StoreError> {
        let Some(mut post) = self.posts.get_mut(&id) else {
            return Ok(None);
        };
        post.title = title;
        post.updated_at = self.next_timestamp();
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.posts.remove(&id).is_some())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn users_by_ids(&self, ids: &[i32]) -> Result<Vec<User>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|user| user.clone()))
            .collect())
    }

    async fn user_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(&id).map(|user| user.clone()))
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let Some(id) = self.username_index.get(username).map(|id| *id) else {
            return Ok(None);
        };
        self.user_by_id(id).await
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let Some(id) = self.email_index.get(email).map(|id| *id) else {
            return Ok(None);
        };
        self.user_by_id(id).await
    }

    async fn insert_user(&self, new: NewUser) -> Result<User, StoreError> {
        let Entry::Vacant(username_slot) = self.username_index.entry(new.username.clone()) else {
            return Err(StoreError::UniqueViolation("username"));
        };
        let Entry::Vacant(email_slot) = self.email_index.entry(new.email.clone()) else {
            return Err(StoreError::UniqueViolation("email"));
        };

        let now = self.next_timestamp();
        let user = User {
            id: self.next_user_id.fetch_add(1, Ordering::SeqCst) + 1,
            username: new.username,
            email: new.email,
            avatar: None,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };

        username_slot.insert(user.id);
        email_slot.insert(user.id);
        self.users.insert(user.id, user.clone());

        Ok(user)
    }
}
