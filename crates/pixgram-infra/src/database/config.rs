use std::env;
#[cfg(feature = "postgres")]
use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the PostgreSQL store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub sql_logging: bool,
}

impl DatabaseConfig {
    /// Load from environment variables. `None` when `DATABASE_URL` is unset.
    pub fn from_env() -> Option<Self> {
        let url = env::var("DATABASE_URL").ok()?;

        Some(Self {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
            sql_logging: env::var("DB_SQL_LOGGING")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }

    /// Open a connection pool.
    #[cfg(feature = "postgres")]
    pub async fn connect(&self) -> Result<DbConn, DbErr> {
        tracing::info!("Connecting to database...");

        let opts = ConnectOptions::new(&self.url)
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(self.sql_logging)
            .to_owned();

        let conn = Database::connect(opts).await?;
        tracing::info!("Database connected (pool: {})", self.max_connections);
        Ok(conn)
    }
}
