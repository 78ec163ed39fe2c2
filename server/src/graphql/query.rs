use async_graphql::{Context, Object, Result};
use todo_core::{TodoUsecase, UserUsecase};
use tracing::info;

use super::error::{identity, reject};
use super::types::{Todo, User};

pub struct Query;

#[Object]
impl Query {
    /// Every registered user.
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        identity(ctx, "users")?;

        let users = ctx
            .data_unchecked::<UserUsecase>()
            .get_all()
            .await
            .map_err(|e| reject("users", e))?;

        info!(count = users.len(), "fetched users");
        Ok(users.into_iter().map(User::from).collect())
    }

    /// Every todo, regardless of owner.
    async fn todos(&self, ctx: &Context<'_>) -> Result<Vec<Todo>> {
        identity(ctx, "todos")?;

        let todos = ctx
            .data_unchecked::<TodoUsecase>()
            .get_all()
            .await
            .map_err(|e| reject("todos", e))?;

        info!(count = todos.len(), "fetched todos");
        Ok(todos.into_iter().map(Todo::from).collect())
    }

    /// A single todo by id.
    async fn todo(&self, ctx: &Context<'_>, #[graphql(default)] id: String) -> Result<Todo> {
        identity(ctx, "todo")?;

        let todo = ctx
            .data_unchecked::<TodoUsecase>()
            .get_by_id(&id)
            .await
            .map_err(|e| reject("todo", e))?;

        Ok(todo.into())
    }

    /// The todos owned by the authenticated user.
    async fn todo_by_user_id(&self, ctx: &Context<'_>) -> Result<Vec<Todo>> {
        let identity = identity(ctx, "todoByUserId")?;

        let todos = ctx
            .data_unchecked::<TodoUsecase>()
            .get_by_user_id(&identity.subject)
            .await
            .map_err(|e| reject("todoByUserId", e))?;

        info!(count = todos.len(), user_id = %identity.subject, "fetched todos for user");
        Ok(todos.into_iter().map(Todo::from).collect())
    }
}
