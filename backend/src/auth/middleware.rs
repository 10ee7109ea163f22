//! Authentication extractor
//!
//! Reads the session token from the `Authorization` header. Clients send the
//! bare token; a `Bearer ` prefix is tolerated.

use super::TokenService;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated user extracted from the session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let user_id = authorize(app_state.tokens(), &parts.headers)?;
        Ok(AuthUser { user_id })
    }
}

/// Verify the request's token and return the user it was issued to
///
/// Every rejection is logged and counted under its reason; the client only
/// ever sees the generic unauthorized response.
pub fn authorize(tokens: &TokenService, headers: &HeaderMap) -> Result<i64, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let Some(header) = header else {
        metrics::counter!("auth_token_rejections_total", "reason" => "missing").increment(1);
        return Err(ApiError::Unauthorized(
            crate::error::UNAUTHORIZED_TOKEN_MESSAGE.to_string(),
        ));
    };

    let token = header.strip_prefix(BEARER_PREFIX).unwrap_or(header);

    tokens.verify_token(token).map_err(|e| {
        if e.is_rejection() {
            warn!(reason = e.reason(), "Rejected session token: {}", e);
            metrics::counter!("auth_token_rejections_total", "reason" => e.reason()).increment(1);
        }
        ApiError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::time::Duration;

    fn service() -> TokenService {
        TokenService::new(b"middleware-test-secret", Duration::from_secs(60))
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_raw_token_is_accepted() {
        let tokens = service();
        let token = tokens.issue_token(7).unwrap();

        assert_eq!(authorize(&tokens, &headers(&token)).unwrap(), 7);
    }

    #[test]
    fn test_bearer_prefix_is_accepted() {
        let tokens = service();
        let token = tokens.issue_token(7).unwrap();

        let value = format!("Bearer {}", token);
        assert_eq!(authorize(&tokens, &headers(&value)).unwrap(), 7);
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let err = authorize(&service(), &HeaderMap::new()).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_blank_header_is_unauthorized() {
        let err = authorize(&service(), &headers("   ")).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_foreign_token_keeps_its_reason() {
        let other = TokenService::new(b"someone-else", Duration::from_secs(60));
        let token = other.issue_token(7).unwrap();

        let err = authorize(&service(), &headers(&token)).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Token(crate::auth::TokenError::BadSignature)
        ));
    }

    #[test]
    fn test_auth_user_debug() {
        let user = AuthUser { user_id: 12 };
        let debug_str = format!("{:?}", user);
        assert!(debug_str.contains("AuthUser"));
    }
}
