//! Storage backends implementing the repository traits.
//!
//! - `postgres`: PostgreSQL through Diesel, r2d2 pool and embedded migrations
//! - `local`: in-memory tables for tests and local development
pub mod local;
#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use local::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use postgres::{PoolStats, PostgresConfig, PostgresRepository};
