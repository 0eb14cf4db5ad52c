/// Response envelope helpers
///
/// Success: `{"success": true, "data": ..., "meta"?: {...}}`
/// Errors carry `{"success": false, "error": {"code", "message"}}` and are
/// produced by the `ServerError` response impl.
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use sideb_core::Page;

/// Wrap a payload in the success envelope
pub fn success<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

/// Wrap one page of results in the success envelope with pagination meta
pub fn paginated<T: Serialize>(page: Page<T>) -> Json<Value> {
    let meta = json!({
        "total": page.total,
        "page": page.page,
        "limit": page.limit,
        "totalPages": page.total_pages(),
        "hasMore": page.has_more(),
    });
    Json(json!({ "success": true, "data": page.items, "meta": meta }))
}
