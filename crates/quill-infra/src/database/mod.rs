//! Store implementations.

mod connections;
pub mod entity;
mod memory;
mod sea_store;

pub use connections::{DatabaseConfig, connect};
pub use memory::{MemoryCategoryStore, MemoryStore};
pub use sea_store::{SeaCategoryStore, SeaPostStore};

#[cfg(test)]
mod tests;
