//! Request/response models exchanged between the cache manager and host network adapters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
/// HTTP method of an outgoing asset request.
pub enum RequestMethod {
    /// `GET`, the only method that participates in caching.
    #[default]
    Get,
    /// `HEAD`.
    Head,
    /// `POST`.
    Post,
    /// `PUT`.
    Put,
    /// `PATCH`.
    Patch,
    /// `DELETE`.
    Delete,
    /// `OPTIONS`.
    Options,
}

impl RequestMethod {
    /// Parses a method token case-insensitively. Unknown tokens yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "HEAD" => Some(Self::Head),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    /// Returns the canonical upper-case token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Outgoing resource request as seen by the service worker.
pub struct AssetRequest {
    /// Request method.
    pub method: RequestMethod,
    /// Absolute or root-relative request URL.
    pub url: String,
}

impl AssetRequest {
    /// Builds a `GET` request for `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: RequestMethod::Get,
            url: url.into(),
        }
    }

    /// Builds a request with an explicit method.
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
        }
    }

    /// Returns whether the request may be looked up in or stored into a cache generation.
    pub fn is_cacheable(&self) -> bool {
        self.method == RequestMethod::Get
    }

    /// Returns the exact-match cache key for this request (URL without fragment).
    pub fn cache_key(&self) -> &str {
        match self.url.split_once('#') {
            Some((base, _)) => base,
            None => &self.url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
/// Fetch response type as reported by the platform.
pub enum ResponseType {
    /// Same-origin response.
    #[default]
    Basic,
    /// Valid cross-origin CORS response.
    Cors,
    /// Synthesized response with no network origin.
    Default,
    /// Network error response.
    Error,
    /// Cross-origin `no-cors` response with an unreadable body.
    Opaque,
    /// Filtered manual-redirect response.
    #[serde(rename = "opaqueredirect")]
    OpaqueRedirect,
}

impl ResponseType {
    /// Parses the platform's `Response.type` token. Unknown tokens map to [`ResponseType::Default`].
    pub fn parse(raw: &str) -> Self {
        match raw {
            "basic" => Self::Basic,
            "cors" => Self::Cors,
            "error" => Self::Error,
            "opaque" => Self::Opaque,
            "opaqueredirect" => Self::OpaqueRedirect,
            _ => Self::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Captured network response.
pub struct AssetResponse {
    /// HTTP status code.
    pub status: u16,
    /// HTTP status text.
    #[serde(default)]
    pub status_text: String,
    /// Platform response type.
    pub response_type: ResponseType,
    /// Response headers in arrival order.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Response body bytes.
    #[serde(default)]
    pub body: Vec<u8>,
}

impl AssetResponse {
    /// Builds a same-origin `200 OK` response carrying `body`.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            response_type: ResponseType::Basic,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Builds a same-origin response with an explicit status.
    pub fn with_status(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: String::new(),
            ..Self::ok(body)
        }
    }

    /// Returns a copy with `response_type` replaced.
    pub fn with_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Appends a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns whether the status is in the `200..=299` range.
    pub fn is_ok(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Looks up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
