//! Memoizing provider wrapper.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::DistanceTable;

use super::{DistanceError, DistanceProvider};

/// Caches resolved tables keyed by the exact address list.
///
/// Failed lookups are not cached, so a rate-limited request can be retried
/// through the same wrapper.
///
/// # Examples
/// ```
/// use carpool_core::{CachingDistanceProvider, DistanceProvider, StaticDistanceProvider};
///
/// let inner = StaticDistanceProvider::new(
///     vec!["A".into(), "B".into()],
///     vec![vec![0, 4], vec![5, 0]],
/// )?;
/// let cached = CachingDistanceProvider::new(inner);
/// let addresses = ["B".to_owned(), "A".to_owned()];
/// assert_eq!(cached.resolve_matrix(&addresses)?, vec![vec![0, 5], vec![4, 0]]);
/// assert_eq!(cached.cached_entries(), 1);
/// # Ok::<(), carpool_core::DistanceError>(())
/// ```
#[derive(Debug)]
pub struct CachingDistanceProvider<P> {
    inner: P,
    entries: Mutex<HashMap<Vec<String>, DistanceTable>>,
}

impl<P> CachingDistanceProvider<P> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The wrapped provider.
    pub const fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of address lists currently cached.
    pub fn cached_entries(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drop every cached table.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<P: DistanceProvider> DistanceProvider for CachingDistanceProvider<P> {
    fn resolve_matrix(&self, addresses: &[String]) -> Result<DistanceTable, DistanceError> {
        if let Some(table) = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(addresses)
        {
            log::debug!("distance cache hit for {} addresses", addresses.len());
            return Ok(table.clone());
        }

        // The lock is released while the inner provider runs so slow lookups
        // for different address lists do not serialize.
        let table = self.inner.resolve_matrix(addresses)?;
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(addresses.to_vec(), table.clone());
        Ok(table)
    }
}
