use std::sync::Arc;

use todo_core::{Repositories, TokenService};

use crate::config::Config;
use crate::graphql::{build_schema, AppSchema};

/// Shared, immutable state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: Arc<TokenService>,
    /// Built once at startup; cloning only bumps a reference count.
    pub schema: AppSchema,
}

impl AppState {
    pub fn new(config: Config, repositories: Repositories) -> todo_core::Result<Self> {
        let tokens = Arc::new(TokenService::new(
            config.jwt_secret.as_bytes(),
            config.user_role.clone(),
        )?);
        let schema = build_schema(repositories, tokens.clone());

        Ok(Self {
            config: Arc::new(config),
            tokens,
            schema,
        })
    }
}
