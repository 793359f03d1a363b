//! Dishpatch Server - food delivery marketplace backend
//!
//! # Architecture overview
//!
//! - **HTTP API** (`api`): RESTful endpoints over axum
//! - **Authentication** (`auth`): JWT + Argon2
//! - **Database** (`db`): embedded SurrealDB storage and repositories
//! - **Order lifecycle** (`orders`): role-gated status state machine
//! - **Reviews** (`reviews`): reviews and derived restaurant ratings
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # configuration, state, server
//! ├── auth/          # JWT auth, request extractor
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # models and repositories
//! ├── orders/        # order lifecycle manager
//! ├── reviews/       # reviews and rating recomputation
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod reviews;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use self::core::{Config, Server, ServerState};
pub use orders::OrderManager;
pub use reviews::ReviewService;
pub use utils::{AppError, AppResponse, AppResult};
pub use utils::logger::{init_logger, init_logger_with_file};
