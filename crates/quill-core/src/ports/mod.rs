//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod category_store;
mod files;
mod post_store;

pub use auth::{AuthError, TokenClaims, TokenService};
pub use category_store::CategoryStore;
pub use files::{FileStore, FileStoreError};
pub use post_store::PostStore;
