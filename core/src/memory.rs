//! In-memory backend implementing every repository trait.
//!
//! # Design
//! Users and todos live in two `RwLock<HashMap>`s keyed by id. Passwords are
//! stored as bcrypt hashes; hashing and verification run on tokio's blocking
//! pool because both are deliberately slow. Users only enter the store through
//! [`MemoryStore::add_user`] or a JSON seed, matching the rule that accounts are
//! created outside this service.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::repository::{AuthRepository, RepositoryResult, TodoRepository, UserRepository};
use crate::types::{CreateTodo, Todo, UpdateTodo, User};

/// A user account as it appears in a seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

struct StoredUser {
    user: User,
    password_hash: String,
}

pub struct MemoryStore {
    users: RwLock<HashMap<String, StoredUser>>,
    todos: RwLock<HashMap<String, Todo>>,
    hash_cost: u32,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_hash_cost(bcrypt::DEFAULT_COST)
    }

    /// Uses a custom bcrypt cost. Low costs are only meant for tests.
    pub fn with_hash_cost(hash_cost: u32) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            todos: RwLock::new(HashMap::new()),
            hash_cost,
        }
    }

    /// Registers a user account, replacing any account with the same id.
    /// Emails identify accounts at login, so a second account may not reuse
    /// one.
    pub async fn add_user(&self, seed: SeedUser) -> RepositoryResult<User> {
        if seed.id.is_empty() {
            return Err(RepositoryError::EmptyField("id"));
        }
        if seed.email.is_empty() {
            return Err(RepositoryError::EmptyField("email"));
        }

        let cost = self.hash_cost;
        let password = seed.password;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;

        let user = User {
            id: seed.id,
            username: seed.username,
            email: seed.email,
        };
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|stored| stored.user.email == user.email && stored.user.id != user.id)
        {
            return Err(RepositoryError::Duplicate {
                field: "email",
                value: user.email,
            });
        }
        users.insert(
            user.id.clone(),
            StoredUser {
                user: user.clone(),
                password_hash,
            },
        );
        Ok(user)
    }

    /// Loads users from a JSON array of [`SeedUser`] and returns how many
    /// were added.
    pub async fn load_seed(&self, json: &str) -> RepositoryResult<usize> {
        let seeds: Vec<SeedUser> = serde_json::from_str(json)
            .map_err(|e| RepositoryError::Backend(format!("invalid seed data: {e}")))?;

        let count = seeds.len();
        for seed in seeds {
            self.add_user(seed).await?;
        }

        info!(count, "seeded users");
        Ok(count)
    }
}

fn todo_not_found(id: &str) -> RepositoryError {
    RepositoryError::NotFound {
        entity: "todo",
        id: id.to_string(),
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get_all(&self) -> RepositoryResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().map(|stored| stored.user.clone()).collect())
    }

    async fn get_by_id(&self, id: &str) -> RepositoryResult<User> {
        let users = self.users.read().await;
        users
            .get(id)
            .map(|stored| stored.user.clone())
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "user",
                id: id.to_string(),
            })
    }
}

#[async_trait]
impl TodoRepository for MemoryStore {
    async fn create(&self, input: CreateTodo) -> RepositoryResult<Todo> {
        if input.description.is_empty() {
            return Err(RepositoryError::EmptyField("description"));
        }
        UserRepository::get_by_id(self, &input.user_id).await?;

        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            description: input.description,
            completed: input.completed,
            user_id: input.user_id,
        };
        self.todos.write().await.insert(todo.id.clone(), todo.clone());
        Ok(todo)
    }

    async fn get_by_id(&self, id: &str) -> RepositoryResult<Todo> {
        let todos = self.todos.read().await;
        todos.get(id).cloned().ok_or_else(|| todo_not_found(id))
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos.values().cloned().collect())
    }

    async fn get_by_user_id(&self, user_id: &str) -> RepositoryResult<Vec<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos
            .values()
            .filter(|todo| todo.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, input: UpdateTodo) -> RepositoryResult<Todo> {
        if input.description.is_empty() {
            return Err(RepositoryError::EmptyField("description"));
        }
        UserRepository::get_by_id(self, &input.user_id).await?;

        let mut todos = self.todos.write().await;
        let todo = todos.get_mut(&input.id).ok_or_else(|| todo_not_found(&input.id))?;
        todo.description = input.description;
        todo.completed = input.completed;
        todo.user_id = input.user_id;
        Ok(todo.clone())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let mut todos = self.todos.write().await;
        todos.remove(id).map(|_| ()).ok_or_else(|| todo_not_found(id))
    }
}

#[async_trait]
impl AuthRepository for MemoryStore {
    async fn authenticate(&self, email: &str, password: &str) -> RepositoryResult<Option<String>> {
        let (user_id, password_hash) = {
            let users = self.users.read().await;
            match users.values().find(|stored| stored.user.email == email) {
                Some(stored) => (stored.user.id.clone(), stored.password_hash.clone()),
                None => return Ok(None),
            }
        };

        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;

        Ok(matches.then_some(user_id))
    }
}
