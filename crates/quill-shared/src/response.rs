//! The uniform response envelope.
//!
//! Success: `{success: true, data, [pagination]}`.
//! Failure: `{success: false, message}` - no data field.

use serde::{Deserialize, Serialize};

use quill_core::page::Page;

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationDto>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            pagination: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success with a message and no data (e.g. after a delete).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            pagination: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// A paged listing: `data` is the page slice, `pagination` the counts.
    pub fn paged<U>(page: Page<U>, map: impl FnMut(U) -> T) -> Self {
        let pagination = PaginationDto::from_page(&page);
        Self {
            success: true,
            data: Some(page.items.into_iter().map(map).collect()),
            message: None,
            pagination: Some(pagination),
        }
    }
}

/// Pagination block attached to listing responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationDto {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl PaginationDto {
    pub fn from_page<T>(page: &Page<T>) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            total: page.total,
            pages: page.pages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use quill_core::page::PageRequest;

    use super::*;

    #[test]
    fn success_envelope_has_no_message() {
        let json = serde_json::to_value(ApiResponse::ok(42)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn failure_envelope_has_no_data() {
        let json = serde_json::to_value(ApiResponse::<()>::failure("Post not found")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Post not found");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn paged_envelope_carries_counts() {
        let page = Page::new(vec![1, 2, 3, 4], PageRequest::new(2, 6), 10);
        let json = serde_json::to_value(ApiResponse::paged(page, |n| n)).unwrap();
        assert_eq!(json["data"].as_array().unwrap().len(), 4);
        assert_eq!(json["pagination"]["pages"], 2);
        assert_eq!(json["pagination"]["total"], 10);
    }
}
