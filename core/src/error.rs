//! Error types for the todo service.
//!
//! # Design
//! Every failure is a variant of a tagged enum and maps to exactly one
//! [`ErrorKind`]. Callers branch on the kind, never on the message text, and
//! the API layer exposes the kind as a stable machine-readable code.

use thiserror::Error;

/// The coarse category of a failure, as seen by API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No token, or a token that could not be verified.
    Unauthenticated,
    /// A valid token whose role does not grant the operation.
    Forbidden,
    /// A required field is empty or malformed.
    Validation,
    /// The referenced record does not exist.
    NotFound,
    /// Login with unknown email or wrong password.
    Credential,
    /// Anything the caller cannot fix: backend or signing failures.
    Internal,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "UNAUTHENTICATED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Credential => "INVALID_CREDENTIALS",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Reasons a request could not be authenticated or authorized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("insufficient permissions")]
    InsufficientRole { required: String, actual: String },
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken(_) => ErrorKind::Unauthenticated,
            AuthError::InsufficientRole { .. } => ErrorKind::Forbidden,
        }
    }
}

/// Failures reported by a repository backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{0} is empty")]
    EmptyField(&'static str),

    #[error("{field} already registered: {value}")]
    Duplicate { field: &'static str, value: String },

    #[error("backend error: {0}")]
    Backend(String),
}

/// Errors returned by the token service and the use cases.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0} is empty")]
    EmptyField(&'static str),

    #[error("invalid email format")]
    InvalidEmail,

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("{operation} failed")]
    OperationFailed {
        operation: &'static str,
        #[source]
        source: RepositoryError,
    },

    #[error("signing key is not configured")]
    MissingSigningKey,

    #[error("token signing failed: {0}")]
    TokenSigning(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Auth(e) => e.kind(),
            Error::EmptyField(_) | Error::InvalidEmail => ErrorKind::Validation,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::InvalidCredentials => ErrorKind::Credential,
            Error::OperationFailed { .. } | Error::MissingSigningKey | Error::TokenSigning(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Classifies a repository failure raised while running `operation`.
    ///
    /// Not-found and empty-field errors keep their meaning; everything else
    /// becomes an internal `OperationFailed`.
    pub fn from_repository(operation: &'static str, source: RepositoryError) -> Self {
        match source {
            RepositoryError::NotFound { entity, id } => Error::NotFound { entity, id },
            RepositoryError::EmptyField(field) => Error::EmptyField(field),
            source @ (RepositoryError::Backend(_) | RepositoryError::Duplicate { .. }) => {
                Error::OperationFailed { operation, source }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_split_into_unauthenticated_and_forbidden() {
        assert_eq!(AuthError::MissingToken.kind(), ErrorKind::Unauthenticated);
        assert_eq!(
            AuthError::InvalidToken("expired".into()).kind(),
            ErrorKind::Unauthenticated
        );
        let mismatch = AuthError::InsufficientRole {
            required: "admin".into(),
            actual: "user".into(),
        };
        assert_eq!(mismatch.kind(), ErrorKind::Forbidden);
        assert_eq!(Error::from(mismatch).kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn repository_not_found_is_kept() {
        let err = Error::from_repository(
            "get todo",
            RepositoryError::NotFound {
                entity: "todo",
                id: "42".into(),
            },
        );
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "todo not found: 42");
    }

    #[test]
    fn repository_backend_failure_becomes_internal() {
        let err = Error::from_repository("create todo", RepositoryError::Backend("timeout".into()));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.to_string(), "create todo failed");
    }

    #[test]
    fn kind_codes_are_stable() {
        assert_eq!(ErrorKind::Unauthenticated.code(), "UNAUTHENTICATED");
        assert_eq!(ErrorKind::Validation.code(), "VALIDATION");
        assert_eq!(ErrorKind::Credential.code(), "INVALID_CREDENTIALS");
    }
}
