//! Domain core for the todo service.
//!
//! # Overview
//! Holds everything below the API layer: domain records, the error kinds the
//! API reports, the session token service, the repository traits with an
//! in-memory backend, and the use cases that validate input and call the
//! repositories.
//!
//! # Design
//! - `TokenService` is stateless apart from its signing key and role name, so
//!   one instance is shared by every request.
//! - Repositories are consumed as `Arc<dyn Trait>`; swapping the backend does
//!   not touch the use cases.
//! - Errors carry an `ErrorKind`; nothing above this crate inspects messages.

pub mod error;
pub mod memory;
pub mod repository;
pub mod token;
pub mod types;
pub mod usecase;

pub use error::{AuthError, Error, ErrorKind, RepositoryError, Result};
pub use memory::{MemoryStore, SeedUser};
pub use repository::{AuthRepository, Repositories, TodoRepository, UserRepository};
pub use token::{Claims, TokenService, TOKEN_TTL_HOURS};
pub use types::{CreateTodo, Identity, Todo, UpdateTodo, User};
pub use usecase::{AuthUsecase, TodoUsecase, UserUsecase};
