//! HTTP-based distance providers for routing services.
//!
//! This module provides [`HttpDistanceProvider`], an implementation of
//! [`carpool_core::DistanceProvider`] that fetches pairwise road distances
//! from a Google Distance Matrix compatible service.
//!
//! # Architecture
//!
//! The provider splits the address list into blocks that respect the
//! service's per-request element limit, requests each block over HTTP and
//! stitches the answers back into one square table. The synchronous
//! [`carpool_core::DistanceProvider`] trait is implemented by blocking on
//! async HTTP calls internally, keeping the core library embeddable in
//! synchronous contexts.
//!
//! # Example
//!
//! ```no_run
//! use carpool_data::routing::{HttpDistanceProvider, HttpDistanceProviderConfig, Metric};
//! use carpool_core::DistanceProvider;
//! use std::time::Duration;
//!
//! let config = HttpDistanceProviderConfig::new("https://maps.googleapis.com", "secret")
//!     .with_metric(Metric::Duration)
//!     .with_timeout(Duration::from_secs(60));
//! let provider = HttpDistanceProvider::with_config(config)?;
//!
//! let addresses = vec![
//!     "1 Infinite Loop, Cupertino, CA".to_owned(),
//!     "555 California St, San Francisco, CA".to_owned(),
//! ];
//! let table = provider.resolve_matrix(&addresses)?;
//! println!("Cupertino to San Francisco: {}s", table[0][1]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod google;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_MAX_BLOCK, DEFAULT_USER_AGENT, HttpDistanceProvider,
    HttpDistanceProviderConfig, Metric, ProviderBuildError,
};
