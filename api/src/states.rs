use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::{MemoryStore, PostStore, UserStore};
use crate::visibility::AssetUrls;

// ============================================================================
// APPLICATION STATE - Shared data across all requests
// ============================================================================
/// Cloned into every request. Only the stores are shared mutable state; all
/// request-scoped data lives in `RequestContext`.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub users: Arc<dyn UserStore>,
    pub assets: AssetUrls,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(posts: Arc<dyn PostStore>, users: Arc<dyn UserStore>, config: AppConfig) -> Self {
        Self {
            posts,
            users,
            assets: AssetUrls::new(config.asset_base_url.clone()),
            config: Arc::new(config),
        }
    }

    /// Both stores served by one in-process `MemoryStore`.
    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, config)
    }
}
