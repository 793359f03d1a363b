//! Repository Module
//!
//! CRUD access to the marketplace tables, one repository per table.
//! Repositories hold no business logic; authorization and lifecycle rules
//! live in the `orders` and `reviews` service modules.

pub mod menu_item;
pub mod order;
pub mod restaurant;
pub mod review;
pub mod user;

pub use menu_item::MenuItemRepository;
pub use order::{OrderRepository, StatusWrite};
pub use restaurant::RestaurantRepository;
pub use review::ReviewRepository;
pub use user::UserRepository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations read "Database index `x` already contains ..."
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse a record id and check it points at the expected table
///
/// Accepts both the full `"table:id"` form and a bare key.
pub(crate) fn parse_id(table: &str, id: &str) -> RepoResult<surrealdb::RecordId> {
    if !id.contains(':') {
        return Ok(surrealdb::RecordId::from_table_key(table, id));
    }
    let rid: surrealdb::RecordId = id
        .parse()
        .map_err(|_| RepoError::Validation(format!("Invalid ID: {id}")))?;
    if rid.table() != table {
        return Err(RepoError::Validation(format!(
            "Invalid {table} ID: {id}"
        )));
    }
    Ok(rid)
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
