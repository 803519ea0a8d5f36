use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use super::{MemoryStore, PostStore, StoreError, UserStore};
use crate::models::{NewPost, NewUser, Post, User};

/// Wraps a `MemoryStore` and records every bulk user fetch.
pub(crate) struct CountingUsers {
    pub inner: Arc<MemoryStore>,
    calls: AtomicUsize,
    batches: Mutex<Vec<Vec<i32>>>,
}

impl CountingUsers {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn bulk_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn batches(&self) -> Vec<Vec<i32>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserStore for CountingUsers {
    async fn users_by_ids(&self, ids: &[i32]) -> Result<Vec<User>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut sorted = ids.to_vec();
        sorted.sort_unstable();
        self.batches.lock().unwrap().push(sorted);
        self.inner.users_by_ids(ids).await
    }

    async fn user_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        self.inner.user_by_id(id).await
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.inner.user_by_username(username).await
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.inner.user_by_email(email).await
    }

    async fn insert_user(&self, new: NewUser) -> Result<User, StoreError> {
        self.inner.insert_user(new).await
    }
}

/// Answers bulk fetches in the reverse of the requested order.
pub(crate) struct ReversedUsers(pub Arc<MemoryStore>);

#[async_trait]
impl UserStore for ReversedUsers {
    async fn users_by_ids(&self, ids: &[i32]) -> Result<Vec<User>, StoreError> {
        let mut users = self.0.users_by_ids(ids).await?;
        users.reverse();
        Ok(users)
    }

    async fn user_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        self.0.user_by_id(id).await
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.0.user_by_username(username).await
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.0.user_by_email(email).await
    }

    async fn insert_user(&self, new: NewUser) -> Result<User, StoreError> {
        self.0.insert_user(new).await
    }
}

/// Every operation fails as if the backend were down.
pub(crate) struct DownStore;

fn down<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("connection refused".to_string()))
}

#[async_trait]
impl UserStore for DownStore {
    async fn users_by_ids(&self, _ids: &[i32]) -> Result<Vec<User>, StoreError> {
        down()
    }

    async fn user_by_id(&self, _id: i32) -> Result<Option<User>, StoreError> {
        down()
    }

    async fn user_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
        down()
    }

    async fn user_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        down()
    }

    async fn insert_user(&self, _new: NewUser) -> Result<User, StoreError> {
        down()
    }
}

#[async_trait]
impl PostStore for DownStore {
    async fn recent_posts(
        &self,
        _take: usize,
        _before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Post>, StoreError> {
        down()
    }

    async fn post_by_id(&self, _id: i32) -> Result<Option<Post>, StoreError> {
        down()
    }

    async fn insert_post(&self, _new: NewPost) -> Result<Post, StoreError> {
        down()
    }

    async fn update_post_title(
        &self,
        _id: i32,
        _title: String,
    ) -> Result<Option<Post>, StoreError> {
        down()
    }

    async fn delete_post(&self, _id: i32) -> Result<bool, StoreError> {
        down()
    }
}

pub(crate) async fn seed_user(store: &MemoryStore, name: &str) -> User {
    store
        .insert_user(NewUser {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            password_hash: "not-a-real-hash".to_string(),
        })
        .await
        .unwrap()
}

pub(crate) async fn seed_post(store: &MemoryStore, title: &str, author_id: i32) -> Post {
    store
        .insert_post(NewPost {
            title: title.to_string(),
            description: Some(format!("about {}", title)),
            body: format!("{} body", title),
            author_id,
        })
        .await
        .unwrap()
}
