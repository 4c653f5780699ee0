//! PostgREST wire details: URL rendering and response headers

use contracts::shared::store_query::StoreQuery;

/// `{rest}/{collection}?select=...&platforms.name=eq.Pixup&order=...`
pub fn render_url(rest_url: &str, query: &StoreQuery) -> String {
    let params = query
        .query_pairs()
        .into_iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(&k), urlencoding::encode(&v)))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}/{}?{}",
        rest_url.trim_end_matches('/'),
        query.collection.name(),
        params
    )
}

/// Total from a `Content-Range` header: `0-19/45` -> 45, `*/0` -> 0
///
/// Returns `None` when the server did not count (`0-19/*`).
pub fn parse_content_range(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse().ok()
}

/// Human-readable part of an error body
///
/// PostgREST answers `{"message": "...", "details": ..., "hint": ...}`;
/// anything else is passed through as-is.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
