use std::sync::Arc;

use crate::loader::UserBatchLoader;
use crate::store::UserStore;

/// State owned by a single request: who is asking, and the loader whose cache
/// must not outlive the request.
pub struct RequestContext {
    pub viewer: Option<i32>,
    pub users: UserBatchLoader,
}

impl RequestContext {
    pub fn new(viewer: Option<i32>, users: Arc<dyn UserStore>) -> Self {
        Self {
            viewer,
            users: UserBatchLoader::new(users),
        }
    }
}
