//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`:
//! SeaORM-backed stores for Postgres, an in-memory store used as fallback
//! and in tests, the JWT token service, and the local-disk file store.

pub mod auth;
pub mod database;
pub mod files;

pub use auth::{JwtConfig, JwtTokenService};
pub use database::{
    DatabaseConfig, MemoryCategoryStore, MemoryStore, SeaCategoryStore, SeaPostStore, connect,
};
pub use files::LocalFileStore;
