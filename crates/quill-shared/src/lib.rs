//! # Quill Shared
//!
//! The API contract: the response envelope and the JSON document shapes
//! returned by the HTTP surface. A client can branch on envelope shape alone.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, PaginationDto};
