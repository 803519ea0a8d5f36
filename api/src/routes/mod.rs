mod graphql;
mod health;

use axum::{
    Router,
    extract::{FromRef, Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    AppState,
    errors::ApiError,
    schema::{AppSchema, build_schema},
};

pub use graphql::{graphiql, graphql_handler};
pub use health::health_check;

/// Router state. Handlers extract the part they need.
#[derive(Clone, FromRef)]
pub struct HttpState {
    pub app: AppState,
    pub schema: AppSchema,
    pub limiter: Arc<DefaultDirectRateLimiter>,
}

async fn rate_limit(
    State(limiter): State<Arc<DefaultDirectRateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.check().is_err() {
        warn!("Rate limit exceeded for {}", req.uri().path());
        return ApiError::RateLimited.into_response();
    }
    next.run(req).await
}

pub fn router(app: AppState) -> Router {
    let limiter = Arc::new(RateLimiter::direct(Quota::per_second(
        app.config.rate_limit_per_second,
    )));
    let state = HttpState {
        schema: build_schema(app.clone()),
        app,
        limiter,
    };

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
