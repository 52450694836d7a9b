//! Store selection - PostgreSQL when configured, in-memory otherwise.

mod memory;

use std::sync::Arc;

use pixgram_core::ports::Store;

use crate::database::DatabaseConfig;

pub use memory::InMemoryStore;

/// Open the store the configuration asks for.
///
/// Falls back to [`InMemoryStore`] when no database is configured, the
/// `postgres` feature is off, or the connection fails.
pub async fn open_store(db_config: Option<&DatabaseConfig>) -> Arc<dyn Store> {
    #[cfg(feature = "postgres")]
    {
        if let Some(config) = db_config {
            match crate::database::PostgresStore::connect(config).await {
                Ok(store) => return Arc::new(store),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }
    }

    #[cfg(not(feature = "postgres"))]
    {
        if db_config.is_some() {
            tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
        }
        tracing::info!("Using in-memory store");
    }

    Arc::new(InMemoryStore::new())
}

/// Mask an email address so it can be logged without leaking PII.
pub(crate) fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let masked_local = match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***"),
            _ => "***".to_string(),
        };
        format!("{masked_local}{domain}")
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests;
