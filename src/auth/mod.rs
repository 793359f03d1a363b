//! Authentication
//!
//! JWT issuance and validation plus the request extractor that turns an
//! `Authorization: Bearer` header into a [`CurrentUser`].

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
