use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::{classify, require};
use crate::error::{Error, Result};
use crate::repository::AuthRepository;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

#[derive(Clone)]
pub struct AuthUsecase {
    repository: Arc<dyn AuthRepository>,
}

impl AuthUsecase {
    pub fn new(repository: Arc<dyn AuthRepository>) -> Self {
        Self { repository }
    }

    /// Checks a login attempt and returns the id of the matching user.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        if !EMAIL.is_match(email) {
            return Err(Error::InvalidEmail);
        }
        require("password", password)?;

        let user_id = self
            .repository
            .authenticate(email, password)
            .await
            .map_err(|e| classify("login", e))?;

        match user_id {
            Some(user_id) => {
                info!(user_id, "login succeeded");
                Ok(user_id)
            }
            None => {
                warn!("login rejected: invalid email or password");
                Err(Error::InvalidCredentials)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern() {
        assert!(EMAIL.is_match("a@example.com"));
        assert!(EMAIL.is_match("first.last+tag@sub.example.org"));
        assert!(!EMAIL.is_match(""));
        assert!(!EMAIL.is_match("no-at-sign.com"));
        assert!(!EMAIL.is_match("a@nodot"));
        assert!(!EMAIL.is_match("two@@example.com"));
    }
}
