use crate::DEFAULT_MAX_CONNECTIONS;

/// Database configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Maximum pooled connections (default: `20`).
    pub max_connections: u32,
}

impl DbConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                    | Default    |
    /// |----------------------------|------------|
    /// | `DATABASE_URL`             | (required) |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`       |
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| DEFAULT_MAX_CONNECTIONS.to_string())
            .parse()
            .expect("DATABASE_MAX_CONNECTIONS must be a valid u32");

        Self {
            database_url,
            max_connections,
        }
    }
}
