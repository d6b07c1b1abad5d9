//! Provider backed by a precomputed address-keyed table.

use std::collections::HashMap;

use crate::DistanceTable;

use super::{DistanceError, DistanceProvider};

/// Answers lookups from a fixed table, for offline solves and tests.
///
/// Requests may name any subset of the known addresses in any order.
/// Unknown addresses fail with [`DistanceError::AddressResolution`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticDistanceProvider {
    positions: HashMap<String, usize>,
    distances: DistanceTable,
}

impl StaticDistanceProvider {
    /// Index `distances` by `addresses`.
    ///
    /// When an address repeats, its first row is used.
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::DimensionMismatch`] unless `distances` is
    /// square with one row per address.
    pub fn new(addresses: Vec<String>, distances: DistanceTable) -> Result<Self, DistanceError> {
        let expected = addresses.len();
        if distances.len() != expected || distances.iter().any(|row| row.len() != expected) {
            return Err(DistanceError::DimensionMismatch {
                expected,
                rows: distances.len(),
            });
        }
        let mut positions = HashMap::with_capacity(expected);
        for (index, address) in addresses.into_iter().enumerate() {
            positions.entry(address).or_insert(index);
        }
        Ok(Self {
            positions,
            distances,
        })
    }

    /// Number of distinct addresses known.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn position(&self, address: &str) -> Result<usize, DistanceError> {
        self.positions
            .get(address)
            .copied()
            .ok_or_else(|| DistanceError::AddressResolution {
                address: address.to_owned(),
            })
    }
}

impl DistanceProvider for StaticDistanceProvider {
    fn resolve_matrix(&self, addresses: &[String]) -> Result<DistanceTable, DistanceError> {
        if addresses.is_empty() {
            return Err(DistanceError::EmptyInput);
        }
        let rows = addresses
            .iter()
            .map(|address| self.position(address))
            .collect::<Result<Vec<_>, _>>()?;
        let table = rows
            .iter()
            .map(|&from| {
                rows.iter()
                    .map(|&to| {
                        self.distances
                            .get(from)
                            .and_then(|row| row.get(to))
                            .copied()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn provider() -> StaticDistanceProvider {
        StaticDistanceProvider::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![vec![0, 1, 2], vec![3, 0, 4], vec![5, 6, 0]],
        )
        .expect("square table")
    }

    #[rstest]
    fn selects_requested_subset(provider: StaticDistanceProvider) {
        let table = provider
            .resolve_matrix(&["C".to_owned(), "A".to_owned()])
            .expect("known addresses");
        assert_eq!(table, vec![vec![0, 5], vec![2, 0]]);
    }

    #[rstest]
    fn unknown_address_fails_resolution(provider: StaticDistanceProvider) {
        let err = provider
            .resolve_matrix(&["A".to_owned(), "Z".to_owned()])
            .expect_err("unknown address");
        assert_eq!(
            err,
            DistanceError::AddressResolution {
                address: "Z".into()
            }
        );
    }

    #[rstest]
    fn rejects_ragged_table() {
        let err = StaticDistanceProvider::new(vec!["A".into(), "B".into()], vec![vec![0, 1], vec![1]])
            .expect_err("ragged table");
        assert_eq!(
            err,
            DistanceError::DimensionMismatch {
                expected: 2,
                rows: 2
            }
        );
    }

    #[rstest]
    fn empty_request_is_rejected(provider: StaticDistanceProvider) {
        assert_eq!(provider.resolve_matrix(&[]), Err(DistanceError::EmptyInput));
        assert_eq!(provider.len(), 3);
        assert!(!provider.is_empty());
    }
}
