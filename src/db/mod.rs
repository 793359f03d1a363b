//! Database Module
//!
//! Embedded SurrealDB storage. Record links between tables are stored as
//! `"table:id"` strings (see `models::serde_helpers`) so WHERE clauses are
//! plain string equality.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "dishpatch";
const DATABASE: &str = "marketplace";

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) an on-disk database at the given path
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {e}")))?;
        Self::init(db).await
    }

    /// Open a throwaway in-memory database, used by tests
    pub async fn new_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::Database(format!("Failed to open in-memory database: {e}")))?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::Database(format!("Failed to select namespace: {e}")))?;

        init_schema(&db).await?;
        tracing::info!("Database ready (ns={NAMESPACE}, db={DATABASE})");

        Ok(Self { db })
    }
}

/// Apply unique indexes. Tables are otherwise schemaless; uniqueness of user
/// emails, restaurant names and (customer, order) review pairs is enforced
/// here rather than in application code alone.
async fn init_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS users_email ON TABLE users FIELDS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS restaurants_name ON TABLE restaurants FIELDS name UNIQUE;
        DEFINE INDEX IF NOT EXISTS reviews_customer_order ON TABLE reviews FIELDS customer, `order` UNIQUE;
        "#,
    )
    .await
    .map_err(|e| AppError::Database(format!("Failed to apply schema: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_in_memory() {
        let service = DbService::new_in_memory().await.unwrap();
        let mut result = service.db.query("RETURN 1 + 1").await.unwrap();
        let value: Option<i64> = result.take(0).unwrap();
        assert_eq!(value, Some(2));
    }

    #[tokio::test]
    async fn opens_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dishpatch.db");
        let service = DbService::new(path.to_str().unwrap()).await.unwrap();
        let mut result = service.db.query("RETURN 2 * 2").await.unwrap();
        let value: Option<i64> = result.take(0).unwrap();
        assert_eq!(value, Some(4));
    }
}
