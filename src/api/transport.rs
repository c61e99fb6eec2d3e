//! Source of raw API responses.
use crate::api::request::QueryWindow;
use crate::error::Result;
use async_trait::async_trait;

/// Undecoded response body plus the charset the source declared, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub body: Vec<u8>,
    pub charset: Option<String>,
}

/// Minimal async trait for fetching one day of inbound calls.
/// - `fetch` returns the body exactly as received; decoding happens upstream.
#[async_trait]
pub trait CallsTransport: Send + Sync {
    async fn fetch(&self, window: &QueryWindow) -> Result<RawResponse>;
}

/// Extract the `charset` parameter of a `Content-Type` header value.
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            let value = value.trim().trim_matches('"');
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}
