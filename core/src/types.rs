//! Domain records shared by the use cases, repositories and the API layer.
//!
//! # Design
//! Ids are plain strings so any backend (UUIDs, database keys, external auth
//! ids) can hand them through unchanged. The API layer defines its own
//! GraphQL output types and converts from these.

use serde::{Deserialize, Serialize};

/// An identity record. Users are created outside this service and are
/// read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// A single todo item, always owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub description: String,
    pub completed: bool,
    pub user_id: String,
}

/// Input for creating a todo. The id is generated by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub user_id: String,
}

/// Input for replacing the mutable fields of an existing todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodo {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub user_id: String,
}

/// The authenticated caller of a request, as proven by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub role: String,
}
