//! Validation and orchestration between the API layer and the repositories.
//!
//! Each use case checks its inputs before touching a repository and turns
//! repository failures into [`crate::Error`] variants with a stable kind.

mod auth;
mod todo;
mod user;

pub use auth::AuthUsecase;
pub use todo::TodoUsecase;
pub use user::UserUsecase;

use tracing::error;

use crate::error::{Error, RepositoryError, Result};

/// Rejects an empty required field, naming it in the error.
pub(crate) fn require(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::EmptyField(field));
    }
    Ok(())
}

/// Maps a repository failure for `operation`, logging the ones that end up
/// as internal errors.
pub(crate) fn classify(operation: &'static str, source: RepositoryError) -> Error {
    let err = Error::from_repository(operation, source);
    if let Error::OperationFailed { source, .. } = &err {
        error!(operation, error = %source, "repository call failed");
    }
    err
}
