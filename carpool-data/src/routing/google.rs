//! Distance Matrix API response types.
//!
//! The service answers every request with a top-level `status` and, when that
//! status is `"OK"`, one row per origin holding one element per destination.
//! Each element carries its own status.
//!
//! See: <https://developers.google.com/maps/documentation/distance-matrix/distance-matrix>

use serde::Deserialize;

/// Top-level Distance Matrix response.
#[derive(Debug, Deserialize)]
pub struct MatrixResponse {
    /// Request status.
    ///
    /// Common values:
    /// - `"OK"` - Request was successful
    /// - `"INVALID_REQUEST"` - Malformed request
    /// - `"MAX_ELEMENTS_EXCEEDED"` - Too many origins × destinations
    /// - `"OVER_QUERY_LIMIT"` / `"OVER_DAILY_LIMIT"` - Quota exhausted
    /// - `"REQUEST_DENIED"` - Key rejected
    pub status: String,

    /// Optional detail when `status` is not `"OK"`.
    #[serde(default)]
    pub error_message: Option<String>,

    /// Origins as geocoded by the service; empty strings mark failures.
    #[serde(default)]
    pub origin_addresses: Vec<String>,

    /// Rows of elements, one per origin.
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

impl MatrixResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }

    /// Check if the response reports an exhausted quota.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.status.as_str(), "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT")
    }
}

/// Elements for one origin.
#[derive(Debug, Deserialize)]
pub struct MatrixRow {
    /// One element per destination.
    pub elements: Vec<MatrixElement>,
}

/// Result for a single origin/destination pair.
#[derive(Debug, Deserialize)]
pub struct MatrixElement {
    /// `"OK"`, `"NOT_FOUND"`, `"ZERO_RESULTS"` or
    /// `"MAX_ROUTE_LENGTH_EXCEEDED"`.
    pub status: String,
    /// Road distance in metres.
    pub distance: Option<ValueText>,
    /// Travel time in seconds.
    pub duration: Option<ValueText>,
}

/// A measured quantity and its human readable rendering.
#[derive(Debug, Deserialize)]
pub struct ValueText {
    /// Value in base units.
    pub value: i64,
    /// Rendering such as `"12.3 km"`.
    #[serde(default)]
    pub text: String,
}
