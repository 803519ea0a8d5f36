use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub cover: Option<String>,
    pub body: String,
    pub points: i32,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the caller when creating a post; the store assigns the rest.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub description: Option<String>,
    pub body: String,
    pub author_id: i32,
}
