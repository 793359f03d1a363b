//! Reviews and derived restaurant ratings
//!
//! `rating` is the pure aggregate; `service` applies the submission gates
//! and keeps the stored aggregate in sync after every write.

pub mod rating;
pub mod service;

pub use service::ReviewService;
