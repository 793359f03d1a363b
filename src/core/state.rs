use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{MenuItemRepository, RestaurantRepository, UserRepository};
use crate::orders::OrderManager;
use crate::reviews::ReviewService;
use crate::utils::AppError;

/// Shared server state
///
/// Cloned into every handler; all members are cheap clones over the same
/// embedded database handle.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub users: UserRepository,
    pub restaurants: RestaurantRepository,
    pub menu_items: MenuItemRepository,
    pub orders: OrderManager,
    pub reviews: ReviewService,
}

impl ServerState {
    /// Initialize state from configuration: working directory, database,
    /// then the services over it
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::Internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("dishpatch.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        let db = db_service.db;

        Ok(Self::with_db(config.clone(), db))
    }

    /// Build state over an existing database handle, used by tests with an
    /// in-memory database
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        Self {
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            config,
            users: UserRepository::new(db.clone()),
            restaurants: RestaurantRepository::new(db.clone()),
            menu_items: MenuItemRepository::new(db.clone()),
            orders: OrderManager::new(db.clone()),
            reviews: ReviewService::new(db.clone()),
            db,
        }
    }
}
