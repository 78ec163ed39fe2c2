use async_graphql::SimpleObject;

#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<todo_core::User> for User {
    fn from(user: todo_core::User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Todo {
    pub id: String,
    pub description: String,
    pub completed: bool,
    pub user_id: String,
}

impl From<todo_core::Todo> for Todo {
    fn from(todo: todo_core::Todo) -> Self {
        Self {
            id: todo.id,
            description: todo.description,
            completed: todo.completed,
            user_id: todo.user_id,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct LoginPayload {
    pub token: String,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct DeleteTodoPayload {
    pub success: bool,
    pub message: String,
}
