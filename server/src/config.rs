//! Process configuration, read once from the environment at startup.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone)]
pub struct Config {
    /// Address the HTTP listener binds to
    pub host: IpAddr,
    pub port: u16,

    /// HMAC secret for session tokens
    pub jwt_secret: String,

    /// Role stamped into issued tokens and required by protected resolvers
    pub user_role: String,

    /// JSON file of users loaded into the in-memory store at startup
    pub seed_file: Option<PathBuf>,

    /// Serve the GraphiQL IDE on `GET /graphql`
    pub graphiql: bool,

    pub cors_allow_any_origin: bool,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            host: parse(&lookup, "HOST", "0.0.0.0")?,
            port: parse(&lookup, "PORT", "8080")?,
            jwt_secret,
            user_role: lookup("USER_ROLE")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "user".to_string()),
            seed_file: lookup("SEED_FILE").filter(|s| !s.is_empty()).map(PathBuf::from),
            graphiql: parse(&lookup, "GRAPHIQL", "true")?,
            cors_allow_any_origin: parse(&lookup, "CORS_ALLOW_ANY_ORIGIN", "false")?,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("user_role", &self.user_role)
            .field("seed_file", &self.seed_file)
            .field("graphiql", &self.graphiql)
            .field("cors_allow_any_origin", &self.cors_allow_any_origin)
            .finish()
    }
}

fn parse<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| default.to_string());
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[("JWT_SECRET", "s3cr3t")]).unwrap();
        assert_eq!(config.addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.user_role, "user");
        assert!(config.seed_file.is_none());
        assert!(config.graphiql);
        assert!(!config.cors_allow_any_origin);
    }

    #[test]
    fn secret_is_required() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing("JWT_SECRET"))));
        assert!(matches!(
            load(&[("JWT_SECRET", "")]),
            Err(ConfigError::Missing("JWT_SECRET"))
        ));
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = load(&[("JWT_SECRET", "x"), ("PORT", "eighty")]).unwrap_err();
        assert_eq!(err.to_string(), r#"invalid value for PORT: "eighty""#);
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("JWT_SECRET", "x"),
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("USER_ROLE", "member"),
            ("SEED_FILE", "seed.json"),
            ("GRAPHIQL", "false"),
        ])
        .unwrap();
        assert_eq!(config.addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.user_role, "member");
        assert_eq!(config.seed_file, Some(PathBuf::from("seed.json")));
        assert!(!config.graphiql);
    }

    #[test]
    fn debug_redacts_secret() {
        let config = load(&[("JWT_SECRET", "top-secret-value")]).unwrap();
        assert!(!format!("{config:?}").contains("top-secret-value"));
    }
}
