use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse},
};

use crate::{
    AppState, auth::resolve_viewer, context::RequestContext, errors::ApiError,
    schema::AppSchema,
};

/// POST /graphql
/// Headers: Authorization: Bearer <token> (optional)
/// Response: 401 if the token is invalid or its user is gone
///
/// Every request gets a fresh `RequestContext`, so loader caches never
/// outlive it.
pub async fn graphql_handler(
    State(state): State<AppState>,
    State(schema): State<AppSchema>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> Result<GraphQLResponse, ApiError> {
    let viewer = resolve_viewer(&headers, &state.config.jwt_secret, state.users.as_ref()).await?;
    let ctx = RequestContext::new(viewer, state.users.clone());

    Ok(schema.execute(req.into_inner().data(ctx)).await.into())
}

/// GET /graphql
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
