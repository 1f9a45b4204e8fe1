//! Shared API request/response types
//!
//! Every endpoint wraps its payload in the [`ApiResponse`] envelope; list
//! endpoints additionally wrap their rows in [`PagedResponse`]. Field names
//! serialize in PascalCase to match the wire format the mobile and admin
//! clients already speak.

use serde::{Deserialize, Serialize};

/// Response envelope carried by every endpoint
///
/// `Data` is `null` whenever `Success` is false; `Errors` carries optional
/// machine-ignorable detail strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub errors: Vec<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response with the default message
    pub fn success(data: T) -> Self {
        Self::success_with_message(data, "Operation successful")
    }

    /// Successful response with an explicit message
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// Failure envelope with no data
    pub fn error(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors,
        }
    }

    /// Failure envelope for a missing resource
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::error(message, vec!["Resource not found".to_string()])
    }
}

/// One page of a list response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub total_count: i64,
    pub page_number: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PagedResponse<T> {
    /// Assemble a page, deriving the navigation fields
    pub fn new(data: Vec<T>, total_count: i64, page_number: i64, page_size: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total_count + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            data,
            total_count,
            page_number,
            page_size,
            total_pages,
            has_previous_page: page_number > 1,
            has_next_page: page_number < total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serializes_pascal_case() {
        let json = serde_json::to_value(ApiResponse::success(7)).unwrap();
        assert_eq!(json["Success"], true);
        assert_eq!(json["Message"], "Operation successful");
        assert_eq!(json["Data"], 7);
        assert_eq!(json["Errors"], serde_json::json!([]));
    }

    #[test]
    fn test_error_envelope_has_null_data() {
        let envelope = ApiResponse::<i64>::error("boom", vec!["detail".to_string()]);
        let json = serde_json::to_value(envelope).unwrap();
        assert_eq!(json["Success"], false);
        assert_eq!(json["Data"], serde_json::Value::Null);
        assert_eq!(json["Errors"][0], "detail");
    }

    #[test]
    fn test_paged_response_navigation() {
        let page = PagedResponse::new(vec![1, 2, 3], 25, 2, 10);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous_page);
        assert!(page.has_next_page);

        let last = PagedResponse::<i64>::new(vec![], 25, 3, 10);
        assert!(!last.has_next_page);

        let empty = PagedResponse::<i64>::new(vec![], 0, 1, 10);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_previous_page);
        assert!(!empty.has_next_page);
    }
}
