use std::sync::Arc;

use super::classify;
use crate::error::Result;
use crate::repository::UserRepository;
use crate::types::User;

#[derive(Clone)]
pub struct UserUsecase {
    repository: Arc<dyn UserRepository>,
}

impl UserUsecase {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_all(&self) -> Result<Vec<User>> {
        self.repository
            .get_all()
            .await
            .map_err(|e| classify("get all users", e))
    }
}
