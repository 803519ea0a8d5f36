//! Request-scoped batch loading of users.
//!
//! Every `load`/`load_many` issued while a batch window is open is collected
//! by the async-graphql `DataLoader`, de-duplicated, and answered by a single
//! `UserStore::users_by_ids` call. Results are cached for the life of the
//! loader, which is owned by one `RequestContext`.

use async_graphql::dataloader::{DataLoader, HashMapCache, Loader};
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

use crate::errors::ApiError;
use crate::models::User;
use crate::store::{StoreError, UserStore};

/// Bulk fetch behind the batching layer.
pub struct UserByIdLoader {
    users: Arc<dyn UserStore>,
}

#[async_trait::async_trait]
impl Loader<i32> for UserByIdLoader {
    type Value = Arc<User>;
    type Error = StoreError;

    async fn load(&self, keys: &[i32]) -> Result<HashMap<i32, Self::Value>, Self::Error> {
        debug!("Batch loading {} users", keys.len());

        let users = self.users.users_by_ids(keys).await?;

        Ok(users
            .into_iter()
            .map(|user| (user.id, Arc::new(user)))
            .collect())
    }
}

/// Per-request user loader. Build a new one for every request.
pub struct UserBatchLoader {
    inner: DataLoader<UserByIdLoader, HashMapCache>,
}

impl UserBatchLoader {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            inner: DataLoader::with_cache(
                UserByIdLoader { users },
                tokio::spawn,
                HashMapCache::default(),
            ),
        }
    }

    /// `None` when no user has this id.
    pub async fn load(&self, id: i32) -> Result<Option<Arc<User>>, ApiError> {
        Ok(self.inner.load_one(id).await?)
    }

    /// Results line up with `ids`; duplicates share one `Arc`.
    pub async fn load_many(&self, ids: &[i32]) -> Result<Vec<Option<Arc<User>>>, ApiError> {
        let found = self.inner.load_many(ids.iter().copied()).await?;

        Ok(ids.iter().map(|id| found.get(id).cloned()).collect())
    }
}
