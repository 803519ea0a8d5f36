//! GraphQL schema: feed and post operations, registration and login.

mod post;
mod user;

use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, MergedObject, Result as GraphQLResult, Schema,
};

use crate::context::RequestContext;
use crate::errors::ApiError;
use crate::states::AppState;

pub use post::{PostMutation, PostQuery};
pub use user::{UserMutation, UserQuery};

#[derive(MergedObject, Default)]
pub struct QueryRoot(PostQuery, UserQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(PostMutation, UserMutation);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// The schema holds only shared state. Each execution must attach its own
/// `RequestContext` with `Request::data`.
pub fn build_schema(state: AppState) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(state)
    .finish()
}

pub(crate) fn graphql_error(err: impl Into<ApiError>) -> async_graphql::Error {
    let err: ApiError = err.into();
    err.extend()
}

pub(crate) fn request_parts<'a>(
    ctx: &Context<'a>,
) -> GraphQLResult<(&'a AppState, &'a RequestContext)> {
    Ok((ctx.data::<AppState>()?, ctx.data::<RequestContext>()?))
}

pub(crate) fn require_viewer(request: &RequestContext) -> GraphQLResult<i32> {
    request
        .viewer
        .ok_or_else(|| graphql_error(ApiError::Unauthenticated))
}
