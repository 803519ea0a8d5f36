// ============================================================================
// BLOG API - GraphQL feed, posts and accounts
// ============================================================================

// - Cursor-paginated feed, newest first
// - Per-request batched author loading
// - Field-level visibility rules (post body, user email)
// - Registration/login with password hashing and JWT
// - Rate limiting, CORS, structured logging

pub mod auth;
pub mod config;
pub mod context;
pub mod dto;
pub mod errors;
pub mod feed;
pub mod loader;
pub mod models;
pub mod routes;
pub mod schema;
pub mod states;
pub mod store;
pub mod visibility;

pub use states::AppState;
