//! Utility modules shared by the adapters.

pub mod http_headers;
pub mod http;
pub mod json;
pub mod url;

pub use http_headers::HttpHeaderBuilder;
pub use json::parse_json_soft;
pub use url::join_url;
