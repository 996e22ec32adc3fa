//! Bearer-token authentication.
//!
//! Each user carries an api token; requests present it as
//! `Authorization: Bearer <token>`.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use sqlx::SqlitePool;

use crate::db::queries::users;
use crate::db::User;
use crate::server::error::ApiError;

/// The authenticated user, if any. Never rejects a request by itself.
pub struct CurrentUser(pub Option<User>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(CurrentUser(None));
        };
        let pool = SqlitePool::from_ref(state);
        let user = users::get_user_by_token(&pool, token).await?;
        if user.is_none() {
            tracing::debug!("Unknown api token");
        }
        Ok(CurrentUser(user))
    }
}

/// Any authenticated user, whatever their role.
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        user.map(AuthenticatedUser).ok_or(ApiError::Unauthenticated)
    }
}

/// An authenticated user whose role allows managing quizzes.
pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await? {
            CurrentUser(Some(user)) if user.role.can_manage_quizzes() => Ok(AdminUser(user)),
            CurrentUser(Some(_)) => Err(ApiError::Forbidden),
            CurrentUser(None) => Err(ApiError::Unauthenticated),
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
