//! Persistence seams consumed by the use cases.
//!
//! Backends implement these traits; the service only ever talks to them
//! through `Arc<dyn ...>` handles, so a remote store and the in-memory store
//! are interchangeable.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RepositoryError;
use crate::types::{CreateTodo, Todo, UpdateTodo, User};

pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_all(&self) -> RepositoryResult<Vec<User>>;

    async fn get_by_id(&self, id: &str) -> RepositoryResult<User>;
}

#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Stores a new todo and returns it with its generated id.
    async fn create(&self, input: CreateTodo) -> RepositoryResult<Todo>;

    async fn get_by_id(&self, id: &str) -> RepositoryResult<Todo>;

    async fn get_all(&self) -> RepositoryResult<Vec<Todo>>;

    async fn get_by_user_id(&self, user_id: &str) -> RepositoryResult<Vec<Todo>>;

    async fn update(&self, input: UpdateTodo) -> RepositoryResult<Todo>;

    async fn delete(&self, id: &str) -> RepositoryResult<()>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Checks a login attempt. Returns the user id on a match and `None` when
    /// the email is unknown or the password is wrong.
    async fn authenticate(&self, email: &str, password: &str) -> RepositoryResult<Option<String>>;
}

/// The set of backend handles the service is wired with.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub todos: Arc<dyn TodoRepository>,
    pub auth: Arc<dyn AuthRepository>,
}

impl Repositories {
    /// Uses one backend for all three repositories.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: UserRepository + TodoRepository + AuthRepository + 'static,
    {
        Self {
            users: backend.clone(),
            todos: backend.clone(),
            auth: backend,
        }
    }
}
