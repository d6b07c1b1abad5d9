//! Test utilities for routing providers.
//!
//! This module provides [`StubDistanceProvider`], a deterministic test double
//! for [`DistanceProvider`] that returns pre-configured responses without
//! making actual HTTP requests.

use carpool_core::{DistanceError, DistanceProvider, DistanceTable};

/// Stub `DistanceProvider` for testing.
///
/// This provider returns pre-configured responses, allowing tests to verify
/// behaviour without requiring a reachable distance service.
///
/// # Example
///
/// ```
/// use carpool_data::routing::test_support::StubDistanceProvider;
/// use carpool_core::DistanceProvider;
///
/// let provider = StubDistanceProvider::with_table(vec![vec![0, 60], vec![60, 0]]);
/// let addresses = vec!["A".to_owned(), "B".to_owned()];
///
/// let result = provider.resolve_matrix(&addresses);
/// assert!(result.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct StubDistanceProvider {
    response: StubResponse,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Table(DistanceTable),
    Error(DistanceError),
}

impl StubDistanceProvider {
    /// Create a provider that returns the given table.
    ///
    /// The table will be returned regardless of the addresses provided,
    /// as long as the input is non-empty.
    #[must_use]
    pub const fn with_table(table: DistanceTable) -> Self {
        Self {
            response: StubResponse::Table(table),
        }
    }

    /// Create a provider that returns the given error.
    ///
    /// Empty input still returns `DistanceError::EmptyInput`.
    #[must_use]
    pub const fn with_error(error: DistanceError) -> Self {
        Self {
            response: StubResponse::Error(error),
        }
    }

    /// Create a provider returning a unit table of the given size.
    ///
    /// The table has zero on the diagonal and one metre for all off-diagonal
    /// entries.
    #[must_use]
    pub fn with_unit_table(size: usize) -> Self {
        Self::with_table(
            (0..size)
                .map(|from| (0..size).map(|to| i64::from(from != to)).collect())
                .collect(),
        )
    }
}

impl DistanceProvider for StubDistanceProvider {
    fn resolve_matrix(&self, addresses: &[String]) -> Result<DistanceTable, DistanceError> {
        if addresses.is_empty() {
            return Err(DistanceError::EmptyInput);
        }

        match &self.response {
            StubResponse::Table(table) => Ok(table.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}
