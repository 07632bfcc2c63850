//! # Chronicle Infrastructure
//!
//! Concrete implementations of the ports defined in `chronicle-core`:
//! file-backed JSON stores, the PostgreSQL stores (behind the `postgres`
//! feature), and the JWT/Argon2 authentication services.

pub mod auth;
pub mod store;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use store::{DatabaseConfig, FilePostStore, FileUserStore};

#[cfg(feature = "postgres")]
pub use store::{PostgresPostStore, PostgresUserStore};
