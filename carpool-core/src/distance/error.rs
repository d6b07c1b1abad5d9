use thiserror::Error;

/// Errors from [`crate::distance::DistanceProvider::resolve_matrix`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistanceError {
    /// No addresses were provided.
    ///
    /// Providers require at least one address to compute a matrix. Every
    /// routing problem has a destination, so this only arises when a provider
    /// is called directly.
    #[error("at least one address is required")]
    EmptyInput,

    /// The provider could not geocode an address.
    #[error("address could not be resolved: {address}")]
    AddressResolution {
        /// The address as supplied by the caller.
        address: String,
    },

    /// The provider throttled the request.
    ///
    /// Callers own the retry policy; providers never retry themselves.
    #[error("distance provider rate limit exceeded")]
    RateLimited,

    /// Both addresses resolved but no route connects them.
    #[error("no route from {from} to {to}")]
    NoRoute {
        /// Origin address.
        from: String,
        /// Target address.
        to: String,
    },

    /// The request timed out.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL with credentials removed.
        url: String,
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// The service answered with a non-success HTTP status.
    #[error("request to {url} failed with status {status}: {message}")]
    HttpError {
        /// Requested URL with credentials removed.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },

    /// The request never reached the service.
    #[error("network error calling {url}: {message}")]
    NetworkError {
        /// Requested URL with credentials removed.
        url: String,
        /// Error detail.
        message: String,
    },

    /// The service rejected the request.
    #[error("distance service returned {code}: {message}")]
    ServiceError {
        /// Service status code.
        code: String,
        /// Service error message, possibly empty.
        message: String,
    },

    /// The response body could not be interpreted.
    #[error("failed to parse distance service response: {message}")]
    ParseError {
        /// Parse failure detail.
        message: String,
    },

    /// The provider returned a table whose shape does not match the request.
    #[error("expected a {expected}x{expected} distance table, found {rows} rows")]
    DimensionMismatch {
        /// Number of distinct addresses requested.
        expected: usize,
        /// Rows returned.
        rows: usize,
    },
}
