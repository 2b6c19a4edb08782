//! Principal extraction.
//!
//! [`authenticate`] runs once per request: it verifies the bearer token and,
//! on success, stores a [`Principal`] in the request extensions. Handlers read
//! it back with the [`CurrentPrincipal`] extractor and pass it to the service
//! layer explicitly. A missing or bad token is not rejected here; mutating
//! services answer 401 when they receive no principal.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::set_sentry_user;
use crate::models::Principal;
use crate::state::AppState;

/// Verify the bearer token, if any, and attach the principal.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match state.identity().verify(token) {
            Ok(principal) => {
                tracing::Span::current().record("user_id", principal.user_id.as_str());
                set_sentry_user(principal.user_id.as_str());
                request.extensions_mut().insert(principal);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid bearer token");
            }
        }
    }
    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|token| !token.is_empty())
}

/// The principal attached by [`authenticate`], if the request had one.
///
/// Never rejects; handlers hand the inner option to the service layer.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Option<Principal>);

impl CurrentPrincipal {
    /// Borrow the principal.
    #[must_use]
    pub const fn as_ref(&self) -> Option<&Principal> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Principal>().cloned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.1.ff")), Some("abc.1.ff"));
        assert_eq!(bearer_token(&headers("bearer  abc.1.ff ")), Some("abc.1.ff"));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
