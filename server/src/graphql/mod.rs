//! GraphQL schema: output types, queries and mutations.

mod error;
mod mutation;
mod query;
mod types;

use std::sync::Arc;

use async_graphql::extensions::Tracing;
use async_graphql::{EmptySubscription, Schema};
use todo_core::{AuthUsecase, Repositories, TodoUsecase, TokenService, UserUsecase};

pub use mutation::Mutation;
pub use query::Query;
pub(crate) use error::CODE;
pub use types::{DeleteTodoPayload, LoginPayload, Todo, User};

pub type AppSchema = Schema<Query, Mutation, EmptySubscription>;

/// Builds the schema with the use cases and token service as shared data.
/// The per-request [`crate::gate::Session`] is attached to each request.
pub fn build_schema(repositories: Repositories, tokens: Arc<TokenService>) -> AppSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .extension(Tracing)
        .data(UserUsecase::new(repositories.users))
        .data(TodoUsecase::new(repositories.todos))
        .data(AuthUsecase::new(repositories.auth))
        .data(tokens)
        .finish()
}
