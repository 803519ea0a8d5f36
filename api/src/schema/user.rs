use async_graphql::{Context, Object, Result as GraphQLResult};
use tracing::info;

use super::{graphql_error, request_parts};
use crate::auth::{create_token, hash_password, verify_password};
use crate::dto::{RegisterInput, UserResponse, UserView, field_errors};
use crate::models::{NewUser, User};
use crate::states::AppState;
use crate::store::StoreError;

/// Successful register/login: the user sees their own profile, plus a token.
fn signed_in(state: &AppState, user: &User) -> GraphQLResult<UserResponse> {
    let token =
        create_token(user.id, &user.username, &state.config.jwt_secret).map_err(graphql_error)?;

    Ok(UserResponse {
        errors: None,
        user: Some(UserView::render(user, Some(user.id), &state.assets)),
        token: Some(token),
    })
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The signed-in user, `null` when anonymous.
    async fn me(&self, ctx: &Context<'_>) -> GraphQLResult<Option<UserView>> {
        let (state, request) = request_parts(ctx)?;
        let Some(viewer) = request.viewer else {
            return Ok(None);
        };

        let user = request.users.load(viewer).await.map_err(graphql_error)?;
        Ok(user.map(|user| UserView::render(&user, request.viewer, &state.assets)))
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn register(
        &self,
        ctx: &Context<'_>,
        options: RegisterInput,
    ) -> GraphQLResult<UserResponse> {
        let (state, _) = request_parts(ctx)?;

        if let Some(errors) = field_errors(&options) {
            return Ok(UserResponse {
                errors: Some(errors),
                ..UserResponse::default()
            });
        }

        let password_hash =
            hash_password(&options.password, state.config.bcrypt_cost).map_err(graphql_error)?;

        let user = match state
            .users
            .insert_user(NewUser {
                username: options.username,
                email: options.email,
                password_hash,
            })
            .await
        {
            Ok(user) => user,
            Err(StoreError::UniqueViolation(_)) => {
                return Ok(UserResponse::error(
                    "username",
                    "username or email already exists.",
                ));
            }
            Err(err) => return Err(graphql_error(err)),
        };

        info!("New user registered: {}", user.username);

        signed_in(state, &user)
    }

    /// Looks the account up by email when the input contains `@`, by username otherwise.
    async fn login(
        &self,
        ctx: &Context<'_>,
        username_or_email: String,
        password: String,
    ) -> GraphQLResult<UserResponse> {
        let (state, _) = request_parts(ctx)?;

        let found = if username_or_email.contains('@') {
            state.users.user_by_email(&username_or_email).await
        } else {
            state.users.user_by_username(&username_or_email).await
        };
        let Some(user) = found.map_err(graphql_error)? else {
            return Ok(UserResponse::error("usernameOrEmail", "User does not exist."));
        };

        // Verify password
        if !verify_password(&password, &user.password_hash).map_err(graphql_error)? {
            return Ok(UserResponse::error("password", "Password is not valid."));
        }

        info!("User logged in: {}", user.username);

        signed_in(state, &user)
    }
}
