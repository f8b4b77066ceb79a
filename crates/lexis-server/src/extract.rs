//! Request extractors.

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::{ApiError, ApiResult};

/// Header carrying the learner identity.
pub const LEARNER_HEADER: &str = "x-learner-id";

/// The learner making the request, `None` for anonymous sessions.
///
/// A blank header counts as anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Learner(pub Option<String>);

impl Learner {
    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// The learner id, or a 400 for anonymous requests.
    pub fn require(&self) -> ApiResult<&str> {
        self.id()
            .ok_or_else(|| ApiError::bad_request("X-Learner-Id header is required"))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Learner
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let learner = parts
            .headers
            .get(LEARNER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Ok(Learner(learner))
    }
}
