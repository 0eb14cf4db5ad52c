/// Requester identity extractor
///
/// Authentication lives with an upstream identity provider; by the time a
/// request reaches this service the caller is already identified, and the
/// identity arrives as the `x-user-id` header. Handlers that act on behalf
/// of a user take this extractor; it is never defaulted to a fixed ID.
use crate::error::ServerError;
use axum::{extract::FromRequestParts, http::request::Parts};
use sideb_core::UserId;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The identified caller of the current request
#[derive(Debug, Clone)]
pub struct Requester(pub UserId);

impl Requester {
    pub fn user_id(&self) -> &UserId {
        &self.0
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(|s| Requester(UserId::new(s)))
            .ok_or_else(|| {
                ServerError::BadRequest(format!("Missing {USER_ID_HEADER} header"))
            })
    }
}
