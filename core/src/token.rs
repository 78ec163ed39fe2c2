//! Session token issuance and verification.
//!
//! # Design
//! Tokens are HS256 JWTs carrying `sub`, `role`, `iat` and `exp`. Nothing is
//! stored server-side: a token is valid exactly when its signature checks out,
//! its `exp` lies in the future and its role matches what the caller requires.
//! Verification pins the algorithm, so a token declaring any other algorithm
//! (including `none`) is rejected before its signature is looked at.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuthError, Error, Result};
use crate::types::Identity;

/// How long an issued token stays valid.
pub const TOKEN_TTL_HOURS: i64 = 24;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Payload of a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user id.
    #[serde(default)]
    pub sub: String,
    pub role: String,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Issues and verifies session tokens with a process-wide signing secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    role: String,
    ttl: Duration,
}

impl TokenService {
    /// Creates a service that signs with `secret` and stamps `role` into every
    /// token it issues. Fails when the secret is empty.
    pub fn new(secret: &[u8], role: impl Into<String>) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::MissingSigningKey);
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            role: role.into(),
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        })
    }

    /// The role claim embedded in issued tokens.
    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn issue(&self, subject: &str) -> Result<String> {
        self.issue_at(subject, Utc::now())
    }

    pub(crate) fn issue_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<String> {
        if subject.is_empty() {
            return Err(Error::EmptyField("subject"));
        }

        let claims = Claims {
            sub: subject.to_string(),
            role: self.role.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| Error::TokenSigning(e.to_string()))?;

        debug!(subject, role = %self.role, "issued session token");
        Ok(token)
    }

    /// Verifies `token` and returns the identity it proves.
    ///
    /// The role check runs after signature and expiry checks, so a forged or
    /// expired token is always reported as invalid rather than forbidden.
    pub fn verify(
        &self,
        token: &str,
        required_role: &str,
    ) -> std::result::Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            let reason = match e.kind() {
                JwtErrorKind::ExpiredSignature => "token expired",
                JwtErrorKind::InvalidAlgorithm => "unexpected signing algorithm",
                JwtErrorKind::InvalidSignature => "signature mismatch",
                JwtErrorKind::MissingRequiredClaim(_) => "missing required claim",
                _ => "malformed token",
            };
            debug!(error = %e, reason, "token rejected");
            AuthError::InvalidToken(reason.to_string())
        })?;

        let claims = data.claims;
        if claims.role != required_role {
            return Err(AuthError::InsufficientRole {
                required: required_role.to_string(),
                actual: claims.role,
            });
        }

        if claims.sub.is_empty() {
            return Err(AuthError::InvalidToken("missing subject".to_string()));
        }

        Ok(Identity {
            subject: claims.sub,
            role: claims.role,
        })
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("role", &self.role)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
