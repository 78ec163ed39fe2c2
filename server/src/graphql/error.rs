use async_graphql::{Context, ErrorExtensions};
use todo_core::{AuthError, Error, ErrorKind, Identity};
use tracing::{error, warn};

use crate::gate::Session;

/// Name of the error extension carrying the [`ErrorKind`] code.
pub const CODE: &str = "code";

/// Logs `err` and converts it into a GraphQL field error tagged with its kind.
pub(crate) fn reject(field: &'static str, err: Error) -> async_graphql::Error {
    let kind = err.kind();
    match kind {
        ErrorKind::Internal => error!(field, error = ?err, "resolver failed"),
        _ => warn!(field, code = kind.code(), error = %err, "resolver rejected request"),
    }

    async_graphql::Error::new(err.to_string())
        .extend_with(|_, ext| ext.set(CODE, kind.code().to_string()))
}

/// The authenticated caller. Every protected resolver calls this before
/// looking at its arguments.
pub(crate) fn identity<'a>(
    ctx: &Context<'a>,
    field: &'static str,
) -> async_graphql::Result<&'a Identity> {
    let session = ctx
        .data_opt::<Session>()
        .ok_or_else(|| reject(field, AuthError::MissingToken.into()))?;
    session.identity().map_err(|reason| reject(field, reason.into()))
}
