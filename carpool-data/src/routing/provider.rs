//! HTTP-based `DistanceProvider` using the Distance Matrix API.
//!
//! This module provides [`HttpDistanceProvider`], an implementation of the
//! [`DistanceProvider`] trait that fetches road distances from a Google
//! Distance Matrix compatible service via HTTP.
//!
//! # Architecture
//!
//! The [`DistanceProvider`] trait is synchronous to keep the core library
//! embeddable in synchronous contexts. This provider bridges the async HTTP
//! calls to the sync interface by blocking on a Tokio runtime internally.
//!
//! The service caps the number of elements per request, so the address list
//! is cut into blocks of at most [`HttpDistanceProviderConfig::max_block`]
//! origins and destinations. Blocks are requested one after another and
//! written into their place in the final table.
//!
//! # Example
//!
//! ```no_run
//! use carpool_data::routing::HttpDistanceProvider;
//! use carpool_core::DistanceProvider;
//!
//! let provider = HttpDistanceProvider::new("api-key")?;
//! let addresses = vec!["Home".to_owned(), "Office".to_owned()];
//! let table = provider.resolve_matrix(&addresses)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::ops::Range;
use std::time::Duration;

use carpool_core::{DistanceError, DistanceProvider, DistanceTable};
use reqwest::{Client, StatusCode};
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::google::{MatrixElement, MatrixResponse};

/// Error type for [`HttpDistanceProvider`] construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// The base URL could not be parsed.
    BaseUrl(url::ParseError),
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// Failed to build the Tokio runtime.
    Runtime(std::io::Error),
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BaseUrl(err) => write!(f, "invalid distance service URL: {err}"),
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "failed to build Tokio runtime: {err}"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BaseUrl(err) => Some(err),
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
        }
    }
}

/// Default user agent for distance requests.
pub const DEFAULT_USER_AGENT: &str = "carpool-routing/0.1";

/// Default service root.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

/// Default block edge: 10 origins × 10 destinations per request.
pub const DEFAULT_MAX_BLOCK: usize = 10;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path of the Distance Matrix endpoint below the base URL.
const MATRIX_PATH: &str = "maps/api/distancematrix/json";

/// Which element value fills the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    /// Road distance in metres.
    #[default]
    Distance,
    /// Travel time in seconds.
    Duration,
}

/// Configuration for [`HttpDistanceProvider`].
#[derive(Debug, Clone)]
pub struct HttpDistanceProviderConfig {
    /// Service root (e.g., `"https://maps.googleapis.com"`).
    pub base_url: String,
    /// API key appended to every request.
    pub api_key: String,
    /// Value extracted from each element.
    pub metric: Metric,
    /// Travel mode, `"driving"` unless overridden.
    pub mode: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Maximum origins (and destinations) per request.
    pub max_block: usize,
}

impl Default for HttpDistanceProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: String::new(),
            metric: Metric::default(),
            mode: "driving".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_block: DEFAULT_MAX_BLOCK,
        }
    }
}

impl HttpDistanceProviderConfig {
    /// Create a new configuration for `base_url` authenticated with `api_key`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the extracted metric.
    #[must_use]
    pub const fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the travel mode.
    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the block edge. Values below one are treated as one.
    #[must_use]
    pub fn with_max_block(mut self, max_block: usize) -> Self {
        self.max_block = max_block.max(1);
        self
    }
}

/// HTTP-based distance provider using the Distance Matrix API.
///
/// This provider implements the synchronous [`DistanceProvider`] trait by
/// internally blocking on asynchronous HTTP requests. It owns a Tokio
/// runtime that is reused across calls.
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, the provider uses its own
/// stored runtime. When called from within an existing multi-threaded Tokio
/// runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]), it uses that runtime's handle with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics.
///
/// When called from within a `current_thread` Tokio runtime, the provider
/// falls back to using its own internal runtime, which may deadlock if the
/// caller's runtime drives IO this request depends on.
///
/// # Errors surfaced
///
/// Quota exhaustion (HTTP 429 or an `OVER_QUERY_LIMIT` status) becomes
/// [`DistanceError::RateLimited`], unknown addresses become
/// [`DistanceError::AddressResolution`] and disconnected pairs become
/// [`DistanceError::NoRoute`]. Nothing is retried.
pub struct HttpDistanceProvider {
    client: Client,
    config: HttpDistanceProviderConfig,
    endpoint: Url,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpDistanceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDistanceProvider")
            .field("endpoint", &self.endpoint.as_str())
            .field("metric", &self.config.metric)
            .field("mode", &self.config.mode)
            .field("max_block", &self.config.max_block)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl HttpDistanceProvider {
    /// Create a provider for the public service using `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpDistanceProviderConfig::new(DEFAULT_BASE_URL, api_key))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client or
    /// Tokio runtime fails to build.
    pub fn with_config(config: HttpDistanceProviderConfig) -> Result<Self, ProviderBuildError> {
        let root = format!("{}/", config.base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&root)
            .and_then(|base| base.join(MATRIX_PATH))
            .map_err(ProviderBuildError::BaseUrl)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            endpoint,
            runtime,
        })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpDistanceProviderConfig {
        &self.config
    }

    /// Build the request URL for one block.
    ///
    /// Addresses are joined with `|` and percent-encoded.
    fn build_block_url(&self, origins: &[String], destinations: &[String]) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("origins", &origins.join("|"))
            .append_pair("destinations", &destinations.join("|"))
            .append_pair("mode", &self.config.mode)
            .append_pair("units", "metric")
            .append_pair("key", &self.config.api_key);
        url
    }

    /// Fetch the full table block by block.
    async fn fetch_table_async(&self, addresses: &[String]) -> Result<DistanceTable, DistanceError> {
        let size = addresses.len();
        let mut table = vec![vec![0_i64; size]; size];
        let ranges = block_ranges(size, self.config.max_block);
        for rows in &ranges {
            for columns in &ranges {
                let origins = addresses.get(rows.clone()).unwrap_or_default();
                let destinations = addresses.get(columns.clone()).unwrap_or_default();
                let response = self.fetch_block_async(origins, destinations).await?;
                let block = self.convert_block(response, origins, destinations)?;
                place_block(&mut table, rows.start, columns.start, block);
            }
        }
        for (index, row) in table.iter_mut().enumerate() {
            if let Some(cell) = row.get_mut(index) {
                *cell = 0;
            }
        }
        log::debug!(
            "resolved {size}x{size} distance table in {} requests",
            ranges.len() * ranges.len()
        );
        Ok(table)
    }

    /// Request one block.
    async fn fetch_block_async(
        &self,
        origins: &[String],
        destinations: &[String],
    ) -> Result<MatrixResponse, DistanceError> {
        let url = self.build_block_url(origins, destinations);
        log::trace!(
            "requesting {}x{} distance block from {}",
            origins.len(),
            destinations.len(),
            self.endpoint
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(err))?;

        response
            .json()
            .await
            .map_err(|err| DistanceError::ParseError {
                message: err.to_string(),
            })
    }

    /// Convert a reqwest error to a `DistanceError`.
    ///
    /// Reported URLs never include the query string, so the key stays out of
    /// logs and error messages.
    fn convert_reqwest_error(&self, error: reqwest::Error) -> DistanceError {
        let url = self.endpoint.to_string();
        if error.is_timeout() {
            return DistanceError::Timeout {
                url,
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            if status == StatusCode::TOO_MANY_REQUESTS {
                return DistanceError::RateLimited;
            }
            return DistanceError::HttpError {
                url,
                status: status.as_u16(),
                message: error.without_url().to_string(),
            };
        }

        DistanceError::NetworkError {
            url,
            message: error.without_url().to_string(),
        }
    }

    /// Convert a block response to a `rows × columns` table.
    fn convert_block(
        &self,
        response: MatrixResponse,
        origins: &[String],
        destinations: &[String],
    ) -> Result<DistanceTable, DistanceError> {
        if response.is_rate_limited() {
            return Err(DistanceError::RateLimited);
        }
        if !response.is_ok() {
            return Err(DistanceError::ServiceError {
                code: response.status,
                message: response.error_message.unwrap_or_default(),
            });
        }
        if response.rows.len() != origins.len() {
            return Err(DistanceError::ParseError {
                message: format!(
                    "expected {} rows in distance response, found {}",
                    origins.len(),
                    response.rows.len()
                ),
            });
        }

        let unresolved_origin = |row: usize| {
            response
                .origin_addresses
                .get(row)
                .is_some_and(String::is_empty)
        };
        origins
            .iter()
            .zip(&response.rows)
            .enumerate()
            .map(|(row_index, (from, row))| {
                if row.elements.len() != destinations.len() {
                    return Err(DistanceError::ParseError {
                        message: format!(
                            "expected {} elements for origin {from}, found {}",
                            destinations.len(),
                            row.elements.len()
                        ),
                    });
                }
                destinations
                    .iter()
                    .zip(&row.elements)
                    .map(|(to, element)| {
                        let failed = if unresolved_origin(row_index) { from } else { to };
                        self.convert_element(element, from, to, failed)
                    })
                    .collect()
            })
            .collect()
    }

    /// Extract the configured metric from one element.
    ///
    /// `failed` names the address blamed for a `NOT_FOUND` element.
    fn convert_element(
        &self,
        element: &MatrixElement,
        from: &str,
        to: &str,
        failed: &str,
    ) -> Result<i64, DistanceError> {
        match element.status.as_str() {
            "OK" => {
                let measured = match self.config.metric {
                    Metric::Distance => element.distance.as_ref(),
                    Metric::Duration => element.duration.as_ref(),
                };
                measured
                    .map(|value| value.value)
                    .ok_or_else(|| DistanceError::ParseError {
                        message: format!(
                            "element {from} -> {to} is missing its {:?} value",
                            self.config.metric
                        ),
                    })
            }
            "NOT_FOUND" => Err(DistanceError::AddressResolution {
                address: failed.to_owned(),
            }),
            "ZERO_RESULTS" => Err(DistanceError::NoRoute {
                from: from.to_owned(),
                to: to.to_owned(),
            }),
            other => Err(DistanceError::ServiceError {
                code: other.to_owned(),
                message: format!("element {from} -> {to}"),
            }),
        }
    }
}

/// Cut `0..len` into consecutive ranges of at most `max_block` indices.
fn block_ranges(len: usize, max_block: usize) -> Vec<Range<usize>> {
    let step = max_block.max(1);
    (0..len)
        .step_by(step)
        .map(|start| start..len.min(start.saturating_add(step)))
        .collect()
}

/// Copy `block` into `table` with its top-left corner at `(row, column)`.
fn place_block(table: &mut DistanceTable, row: usize, column: usize, block: DistanceTable) {
    for (offset, values) in block.into_iter().enumerate() {
        let Some(target) = table.get_mut(row + offset) else {
            continue;
        };
        for (column_offset, value) in values.into_iter().enumerate() {
            if let Some(cell) = target.get_mut(column + column_offset) {
                *cell = value;
            }
        }
    }
}

impl DistanceProvider for HttpDistanceProvider {
    /// Fetch the distance table for the given addresses.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must be
    /// multi-threaded (`flavor = "multi_thread"`). Otherwise the method falls
    /// back to its own internal runtime.
    fn resolve_matrix(&self, addresses: &[String]) -> Result<DistanceTable, DistanceError> {
        if addresses.is_empty() {
            return Err(DistanceError::EmptyInput);
        }

        let future = self.fetch_table_async(addresses);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn provider() -> HttpDistanceProvider {
        HttpDistanceProvider::with_config(HttpDistanceProviderConfig::new(
            "https://maps.example.com",
            "secret",
        ))
        .expect("provider should build")
    }

    fn addresses(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_owned()).collect()
    }

    fn response(json: &str) -> MatrixResponse {
        serde_json::from_str(json).expect("fixture should deserialise")
    }

    #[rstest]
    fn build_block_url_encodes_addresses(provider: HttpDistanceProvider) {
        let url = provider.build_block_url(
            &addresses(&["1 Main St, Springfield", "Elm & Oak"]),
            &addresses(&["Office"]),
        );

        assert_eq!(url.path(), "/maps/api/distancematrix/json");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("origins".to_owned(), "1 Main St, Springfield|Elm & Oak".to_owned()),
                ("destinations".to_owned(), "Office".to_owned()),
                ("mode".to_owned(), "driving".to_owned()),
                ("units".to_owned(), "metric".to_owned()),
                ("key".to_owned(), "secret".to_owned()),
            ]
        );
        assert!(!url.as_str().contains("Elm & Oak"));
    }

    #[rstest]
    #[case("https://maps.example.com")]
    #[case("https://maps.example.com/")]
    fn endpoint_ignores_trailing_slash(#[case] base_url: &str) {
        let provider =
            HttpDistanceProvider::with_config(HttpDistanceProviderConfig::new(base_url, "k"))
                .expect("provider should build");
        assert_eq!(
            provider.endpoint.as_str(),
            "https://maps.example.com/maps/api/distancematrix/json"
        );
    }

    #[rstest]
    fn invalid_base_url_fails_to_build() {
        let err = HttpDistanceProvider::with_config(HttpDistanceProviderConfig::new("not a url", "k"))
            .expect_err("should fail");
        assert!(matches!(err, ProviderBuildError::BaseUrl(_)));
    }

    #[rstest]
    #[case(0, 10, vec![])]
    #[case(3, 10, vec![0..3])]
    #[case(10, 10, vec![0..10])]
    #[case(23, 10, vec![0..10, 10..20, 20..23])]
    #[case(3, 0, vec![0..1, 1..2, 2..3])]
    fn block_ranges_cover_every_index(
        #[case] len: usize,
        #[case] max_block: usize,
        #[case] expected: Vec<Range<usize>>,
    ) {
        assert_eq!(block_ranges(len, max_block), expected);
    }

    #[rstest]
    fn place_block_writes_at_offset() {
        let mut table = vec![vec![0; 3]; 3];
        place_block(&mut table, 1, 2, vec![vec![7], vec![8]]);
        assert_eq!(table, vec![vec![0, 0, 0], vec![0, 0, 7], vec![0, 0, 8]]);
    }

    #[rstest]
    fn convert_block_reads_distances(provider: HttpDistanceProvider) {
        let block = provider
            .convert_block(
                response(
                    r#"{"status": "OK", "rows": [{"elements": [
                        {"status": "OK", "distance": {"value": 1200}, "duration": {"value": 90}},
                        {"status": "OK", "distance": {"value": 3400}, "duration": {"value": 240}}
                    ]}]}"#,
                ),
                &addresses(&["A"]),
                &addresses(&["B", "C"]),
            )
            .expect("should convert");
        assert_eq!(block, vec![vec![1200, 3400]]);
    }

    #[rstest]
    fn convert_block_reads_durations() {
        let provider = HttpDistanceProvider::with_config(
            HttpDistanceProviderConfig::new("https://maps.example.com", "k")
                .with_metric(Metric::Duration),
        )
        .expect("provider should build");
        let block = provider
            .convert_block(
                response(
                    r#"{"status": "OK", "rows": [{"elements": [
                        {"status": "OK", "distance": {"value": 1200}, "duration": {"value": 90}}
                    ]}]}"#,
                ),
                &addresses(&["A"]),
                &addresses(&["B"]),
            )
            .expect("should convert");
        assert_eq!(block, vec![vec![90]]);
    }

    #[rstest]
    #[case(r#"{"status": "OVER_QUERY_LIMIT"}"#, DistanceError::RateLimited)]
    #[case(r#"{"status": "OVER_DAILY_LIMIT", "error_message": "quota"}"#, DistanceError::RateLimited)]
    #[case(
        r#"{"status": "REQUEST_DENIED", "error_message": "bad key"}"#,
        DistanceError::ServiceError { code: "REQUEST_DENIED".to_owned(), message: "bad key".to_owned() }
    )]
    #[case(
        r#"{"status": "OK", "origin_addresses": ["A St"], "rows": [{"elements": [{"status": "NOT_FOUND"}]}]}"#,
        DistanceError::AddressResolution { address: "B".to_owned() }
    )]
    #[case(
        r#"{"status": "OK", "origin_addresses": [""], "rows": [{"elements": [{"status": "NOT_FOUND"}]}]}"#,
        DistanceError::AddressResolution { address: "A".to_owned() }
    )]
    #[case(
        r#"{"status": "OK", "rows": [{"elements": [{"status": "ZERO_RESULTS"}]}]}"#,
        DistanceError::NoRoute { from: "A".to_owned(), to: "B".to_owned() }
    )]
    #[case(
        r#"{"status": "OK", "rows": [{"elements": [{"status": "MAX_ROUTE_LENGTH_EXCEEDED"}]}]}"#,
        DistanceError::ServiceError { code: "MAX_ROUTE_LENGTH_EXCEEDED".to_owned(), message: "element A -> B".to_owned() }
    )]
    fn convert_block_maps_failures(
        provider: HttpDistanceProvider,
        #[case] json: &str,
        #[case] expected: DistanceError,
    ) {
        let err = provider
            .convert_block(response(json), &addresses(&["A"]), &addresses(&["B"]))
            .expect_err("should fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case(r#"{"status": "OK", "rows": []}"#)]
    #[case(r#"{"status": "OK", "rows": [{"elements": []}]}"#)]
    #[case(r#"{"status": "OK", "rows": [{"elements": [{"status": "OK"}]}]}"#)]
    fn convert_block_rejects_malformed_shapes(provider: HttpDistanceProvider, #[case] json: &str) {
        let err = provider
            .convert_block(response(json), &addresses(&["A"]), &addresses(&["B"]))
            .expect_err("should fail");
        assert!(matches!(err, DistanceError::ParseError { .. }), "{err:?}");
    }

    #[rstest]
    fn empty_input_returns_error(provider: HttpDistanceProvider) {
        let err = provider.resolve_matrix(&[]).expect_err("should fail");
        assert_eq!(err, DistanceError::EmptyInput);
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpDistanceProviderConfig::new("http://example.com", "key")
            .with_metric(Metric::Duration)
            .with_mode("walking")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent/1.0")
            .with_max_block(0);

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.metric, Metric::Duration);
        assert_eq!(config.mode, "walking");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.max_block, 1);
    }

    #[rstest]
    fn debug_output_hides_the_key(provider: HttpDistanceProvider) {
        assert!(!format!("{provider:?}").contains("secret"));
    }
}
