use std::sync::Arc;

use async_graphql::{Context, Object, Result};
use todo_core::{AuthUsecase, CreateTodo, TodoUsecase, TokenService, UpdateTodo};
use tracing::info;

use super::error::{identity, reject};
use super::types::{DeleteTodoPayload, LoginPayload, Todo};

pub struct Mutation;

#[Object]
impl Mutation {
    /// Creates a todo owned by the authenticated user.
    async fn create_todo(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] description: String,
        #[graphql(default)] completed: bool,
    ) -> Result<Todo> {
        let identity = identity(ctx, "createTodo")?;

        let todo = ctx
            .data_unchecked::<TodoUsecase>()
            .create(CreateTodo {
                description,
                completed,
                user_id: identity.subject.clone(),
            })
            .await
            .map_err(|e| reject("createTodo", e))?;

        info!(id = %todo.id, "created todo");
        Ok(todo.into())
    }

    /// Replaces the description and completion state of a todo. The
    /// authenticated user becomes its owner.
    async fn update_todo(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] id: String,
        #[graphql(default)] description: String,
        #[graphql(default)] completed: bool,
    ) -> Result<Todo> {
        let identity = identity(ctx, "updateTodo")?;

        let todo = ctx
            .data_unchecked::<TodoUsecase>()
            .update(UpdateTodo {
                id,
                description,
                completed,
                user_id: identity.subject.clone(),
            })
            .await
            .map_err(|e| reject("updateTodo", e))?;

        info!(id = %todo.id, "updated todo");
        Ok(todo.into())
    }

    async fn delete_todo(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] id: String,
    ) -> Result<DeleteTodoPayload> {
        identity(ctx, "deleteTodo")?;

        ctx.data_unchecked::<TodoUsecase>()
            .delete(&id)
            .await
            .map_err(|e| reject("deleteTodo", e))?;

        info!(%id, "deleted todo");
        Ok(DeleteTodoPayload {
            success: true,
            message: "Todo deleted successfully".to_string(),
        })
    }

    /// Exchanges credentials for a session token. Needs no prior identity.
    async fn login(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] email: String,
        #[graphql(default)] password: String,
    ) -> Result<LoginPayload> {
        let user_id = ctx
            .data_unchecked::<AuthUsecase>()
            .login(&email, &password)
            .await
            .map_err(|e| reject("login", e))?;

        let token = ctx
            .data_unchecked::<Arc<TokenService>>()
            .issue(&user_id)
            .map_err(|e| reject("login", e))?;

        Ok(LoginPayload { token })
    }
}
