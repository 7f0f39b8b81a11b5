//! Response envelope shared by every endpoint.
//!
//! ```json
//! { "success": true, "data": { ... }, "message": "Products fetched successfully" }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use stock_core::PaginatedResult;

/// `{ success, data, message }`
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            message: message.into(),
        }
    }

    /// Sends this envelope with `201 Created`.
    pub fn created(self) -> (StatusCode, Self) {
        (StatusCode::CREATED, self)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Data block of a paginated listing.
///
/// `count` is the number of items on this page; `total` counts every
/// matching row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData<T> {
    pub items: Vec<T>,
    pub count: usize,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> From<PaginatedResult<T>> for PageData<T> {
    fn from(result: PaginatedResult<T>) -> Self {
        PageData {
            count: result.count(),
            page: result.page,
            limit: result.limit,
            total: result.total,
            total_pages: result.total_pages,
            items: result.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stock_core::Pagination;

    #[test]
    fn test_success_envelope() {
        let body = serde_json::to_value(ApiResponse::success(json!({"id": 1}), "ok")).unwrap();
        assert_eq!(body, json!({"success": true, "data": {"id": 1}, "message": "ok"}));
    }

    #[test]
    fn test_failure_envelope_has_null_data() {
        let body = serde_json::to_value(ApiResponse::<()>::failure("nope")).unwrap();
        assert_eq!(body, json!({"success": false, "data": null, "message": "nope"}));
    }

    #[test]
    fn test_page_data_keys() {
        let result = PaginatedResult::assemble(vec!["a", "b"], 12, Pagination::new(3, 5));
        let body = serde_json::to_value(PageData::from(result)).unwrap();

        assert_eq!(
            body,
            json!({
                "items": ["a", "b"],
                "count": 2,
                "page": 3,
                "limit": 5,
                "total": 12,
                "totalPages": 3
            })
        );
    }

    #[test]
    fn test_created_status() {
        let (status, _) = ApiResponse::success(1, "made").created();
        assert_eq!(status, StatusCode::CREATED);
    }
}
