//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use super::error::ApiErrorResponse;
use crate::identity::{Actor, GlobalRole, UserId};

/// Header carrying the caller's numeric user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the caller's global role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .and_then(|value| UserId::new(value).ok())
            .ok_or_else(|| {
                ApiErrorResponse::unauthorized(format!(
                    "missing or invalid {USER_ID_HEADER} header"
                ))
            })?;
        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map_or(GlobalRole::User, GlobalRole::from_header);
        Ok(Self::new(user_id, role))
    }
}

/// JSON body whose rejections are reported as [`ApiErrorResponse`] bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
