use std::sync::Arc;

use tracing::instrument;

use super::{classify, require};
use crate::error::Result;
use crate::repository::TodoRepository;
use crate::types::{CreateTodo, Todo, UpdateTodo};

#[derive(Clone)]
pub struct TodoUsecase {
    repository: Arc<dyn TodoRepository>,
}

impl TodoUsecase {
    pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Todo>> {
        self.repository
            .get_all()
            .await
            .map_err(|e| classify("get all todos", e))
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Todo> {
        require("id", id)?;
        self.repository
            .get_by_id(id)
            .await
            .map_err(|e| classify("get todo", e))
    }

    #[instrument(skip(self))]
    pub async fn get_by_user_id(&self, user_id: &str) -> Result<Vec<Todo>> {
        require("user_id", user_id)?;
        self.repository
            .get_by_user_id(user_id)
            .await
            .map_err(|e| classify("get todos by user", e))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: CreateTodo) -> Result<Todo> {
        require("description", &input.description)?;
        require("user_id", &input.user_id)?;
        self.repository
            .create(input)
            .await
            .map_err(|e| classify("create todo", e))
    }

    #[instrument(skip(self))]
    pub async fn update(&self, input: UpdateTodo) -> Result<Todo> {
        require("id", &input.id)?;
        require("description", &input.description)?;
        require("user_id", &input.user_id)?;
        self.repository
            .update(input)
            .await
            .map_err(|e| classify("update todo", e))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        require("id", id)?;
        self.repository
            .delete(id)
            .await
            .map_err(|e| classify("delete todo", e))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::{Error, ErrorKind, RepositoryError};
    use crate::repository::RepositoryResult;

    /// Fails every call, to check that backend errors are wrapped.
    struct BrokenRepository;

    #[async_trait]
    impl TodoRepository for BrokenRepository {
        async fn create(&self, _: CreateTodo) -> RepositoryResult<Todo> {
            Err(RepositoryError::Backend("connection reset".into()))
        }
        async fn get_by_id(&self, _: &str) -> RepositoryResult<Todo> {
            Err(RepositoryError::Backend("connection reset".into()))
        }
        async fn get_all(&self) -> RepositoryResult<Vec<Todo>> {
            Err(RepositoryError::Backend("connection reset".into()))
        }
        async fn get_by_user_id(&self, _: &str) -> RepositoryResult<Vec<Todo>> {
            Err(RepositoryError::Backend("connection reset".into()))
        }
        async fn update(&self, _: UpdateTodo) -> RepositoryResult<Todo> {
            Err(RepositoryError::Backend("connection reset".into()))
        }
        async fn delete(&self, _: &str) -> RepositoryResult<()> {
            Err(RepositoryError::Backend("connection reset".into()))
        }
    }

    fn usecase() -> TodoUsecase {
        TodoUsecase::new(Arc::new(BrokenRepository))
    }

    #[tokio::test]
    async fn validation_runs_before_the_repository() {
        let err = usecase()
            .create(CreateTodo {
                description: String::new(),
                completed: false,
                user_id: "u-1".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyField("description")));

        let err = usecase()
            .create(CreateTodo {
                description: "x".into(),
                completed: false,
                user_id: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyField("user_id")));
    }

    #[tokio::test]
    async fn update_checks_id_first() {
        let err = usecase()
            .update(UpdateTodo {
                id: String::new(),
                description: String::new(),
                completed: false,
                user_id: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyField("id")));
    }

    #[tokio::test]
    async fn backend_failures_are_internal() {
        let err = usecase().get_all().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.to_string(), "get all todos failed");

        let err = usecase().delete("t-1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
