//! # Quill Core
//!
//! The domain layer of the Quill blogging backend.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod authz;
pub mod domain;
pub mod error;
pub mod page;
pub mod ports;
pub mod slug;

pub use error::{DomainError, StoreError};
