//! Authentication gate in front of the GraphQL engine.
//!
//! # Design
//! The gate never rejects a request. It verifies the bearer token when one is
//! present and hands the outcome to the engine as a typed [`Session`]; each
//! resolver that needs an identity reports the recorded failure itself. This
//! keeps `login` reachable without a token and gives every protected field
//! the same "identity first" behavior.

use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use todo_core::{AuthError, Identity, TokenService};
use tracing::{debug, warn};

use crate::state::AppState;

/// Outcome of authenticating one request.
#[derive(Debug, Clone)]
pub enum Session {
    Authenticated(Identity),
    Anonymous(AuthError),
}

impl Session {
    /// The caller's identity, or the reason there is none.
    pub fn identity(&self) -> Result<&Identity, AuthError> {
        match self {
            Session::Authenticated(identity) => Ok(identity),
            Session::Anonymous(reason) => Err(reason.clone()),
        }
    }
}

/// Reads the `Authorization` header and verifies its bearer token.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService, required_role: &str) -> Session {
    let token = match bearer_token(headers) {
        Ok(token) => token,
        Err(reason) => {
            debug!(%reason, "request is unauthenticated");
            return Session::Anonymous(reason);
        }
    };

    match tokens.verify(token, required_role) {
        Ok(identity) => {
            debug!(subject = %identity.subject, "request authenticated");
            Session::Authenticated(identity)
        }
        Err(reason) => {
            warn!(%reason, "token verification failed");
            Session::Anonymous(reason)
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = match headers.get(AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::MissingToken),
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::InvalidToken("malformed authorization header".to_string()))
}

impl<S> FromRequestParts<S> for Session
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(authenticate(&parts.headers, &state.tokens, state.tokens.role()))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn tokens() -> TokenService {
        TokenService::new(b"gate-secret", "user").unwrap()
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_missing_token() {
        let session = authenticate(&HeaderMap::new(), &tokens(), "user");
        assert_eq!(session.identity().unwrap_err(), AuthError::MissingToken);
    }

    #[test]
    fn non_bearer_scheme_is_invalid() {
        let session = authenticate(&headers("Basic dXNlcjpwYXNz"), &tokens(), "user");
        assert!(matches!(session.identity(), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn empty_bearer_is_invalid() {
        let session = authenticate(&headers("Bearer "), &tokens(), "user");
        assert!(matches!(session.identity(), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn valid_token_authenticates() {
        let tokens = tokens();
        let token = tokens.issue("u-1").unwrap();
        let session = authenticate(&headers(&format!("Bearer {token}")), &tokens, "user");
        assert_eq!(session.identity().unwrap().subject, "u-1");
    }

    #[test]
    fn issued_role_passes_the_gate() {
        let tokens = TokenService::new(b"gate-secret", "member").unwrap();
        let token = tokens.issue("u-1").unwrap();
        let session = authenticate(&headers(&format!("Bearer {token}")), &tokens, tokens.role());
        assert_eq!(session.identity().unwrap().role, "member");
    }

    #[test]
    fn wrong_role_is_forbidden() {
        let tokens = tokens();
        let token = tokens.issue("u-1").unwrap();
        let session = authenticate(&headers(&format!("Bearer {token}")), &tokens, "admin");
        assert!(matches!(
            session.identity(),
            Err(AuthError::InsufficientRole { .. })
        ));
    }
}
