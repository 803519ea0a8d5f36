//! Field-level redaction and presentation rules.
//!
//! Each rule is a pure function of the entity and the viewer. Redacted
//! fields stay in the response as empty strings.

use crate::models::{Post, User};

/// Post bodies are for signed-in viewers only.
pub fn post_body(post: &Post, viewer: Option<i32>) -> String {
    match viewer {
        Some(_) => post.body.clone(),
        None => String::new(),
    }
}

/// A user's email is only shown to that user.
pub fn user_email(user: &User, viewer: Option<i32>) -> String {
    if viewer == Some(user.id) {
        user.email.clone()
    } else {
        String::new()
    }
}

/// Turns stored asset references into absolute URLs.
#[derive(Debug, Clone)]
pub struct AssetUrls {
    base: String,
}

impl AssetUrls {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn post_cover(&self, post: &Post) -> String {
        self.resolve("post", post.cover.as_deref())
    }

    pub fn user_avatar(&self, user: &User) -> String {
        self.resolve("user", user.avatar.as_deref())
    }

    fn resolve(&self, kind: &str, reference: Option<&str>) -> String {
        match reference {
            Some(name) if !name.is_empty() => format!("{}/{}/{}", self.base, kind, name),
            _ => String::new(),
        }
    }
}
