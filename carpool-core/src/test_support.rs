//! Deterministic distance providers for unit and behaviour tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{DistanceError, DistanceProvider, DistanceTable};

fn unit_table(size: usize) -> DistanceTable {
    (0..size)
        .map(|from| (0..size).map(|to| i64::from(from != to)).collect())
        .collect()
}

/// Provider placing every pair of distinct addresses one metre apart.
#[derive(Default, Debug, Copy, Clone)]
pub struct UnitDistanceProvider;

impl DistanceProvider for UnitDistanceProvider {
    fn resolve_matrix(&self, addresses: &[String]) -> Result<DistanceTable, DistanceError> {
        if addresses.is_empty() {
            return Err(DistanceError::EmptyInput);
        }
        Ok(unit_table(addresses.len()))
    }
}

/// Provider that always fails with the configured error.
#[derive(Debug, Clone)]
pub struct FailingDistanceProvider {
    error: DistanceError,
}

impl FailingDistanceProvider {
    /// Fail every lookup with `error`.
    #[must_use]
    pub const fn new(error: DistanceError) -> Self {
        Self { error }
    }
}

impl DistanceProvider for FailingDistanceProvider {
    fn resolve_matrix(&self, _addresses: &[String]) -> Result<DistanceTable, DistanceError> {
        Err(self.error.clone())
    }
}

/// [`UnitDistanceProvider`] that counts successful lookups.
#[derive(Debug, Default)]
pub struct CountingDistanceProvider {
    calls: AtomicUsize,
}

impl CountingDistanceProvider {
    /// Number of lookups answered so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DistanceProvider for CountingDistanceProvider {
    fn resolve_matrix(&self, addresses: &[String]) -> Result<DistanceTable, DistanceError> {
        let table = UnitDistanceProvider.resolve_matrix(addresses)?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(table)
    }
}
