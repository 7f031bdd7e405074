//! Auth context.
//!
//! Authentication itself happens upstream; the auth provider forwards the
//! signed-in user's identity as request headers. These extractors turn those
//! headers into typed context for handlers.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub is_admin: bool,
}

impl CurrentUser {
    /// `Ok(None)` when no identity was forwarded; `Err` when it is malformed.
    pub fn from_headers(headers: &HeaderMap) -> Result<Option<Self>, AppError> {
        let Some(raw_id) = header(headers, USER_ID_HEADER) else { return Ok(None) };
        let id = Uuid::parse_str(raw_id).map_err(|_| AppError::Unauthorized("Invalid user identity".into()))?;
        let email = header(headers, USER_EMAIL_HEADER).map(str::to_string);
        let is_admin = header(headers, USER_ROLE_HEADER)
            .is_some_and(|roles| roles.split(',').any(|r| r.trim().eq_ignore_ascii_case("admin")));
        Ok(Some(Self { id, email, is_admin }))
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim).filter(|v| !v.is_empty())
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)?.ok_or_else(|| AppError::Unauthorized("Please sign in".into()))
    }
}

/// Identity when present; anonymous browsing otherwise.
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<CurrentUser>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(CurrentUser::from_headers(&parts.headers)?))
    }
}

/// Signed-in user carrying the admin role.
#[derive(Clone, Debug)]
pub struct RequireAdmin(pub CurrentUser);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            tracing::warn!(user_id = %user.id, "non-admin user attempted admin access");
            return Err(AppError::Forbidden("Admin access required".into()));
        }
        Ok(Self(user))
    }
}
