//! Map node indices onto the distinct addresses a provider resolves.
//!
//! Two passengers may wait at the same address and a driver may live at the
//! destination, yet providers expect each address once. [`NodeAddresses`]
//! records which distinct address backs each node so the provider's table can
//! be expanded back into node order.

use std::collections::HashMap;

use crate::{DistanceTable, Location, Stop, Vehicle};

use super::{DistanceError, DistanceProvider};

/// Distinct addresses of a node set plus the node-to-address mapping.
///
/// # Examples
/// ```
/// use carpool_core::{Location, NodeAddresses, Stop, Vehicle};
///
/// let addresses = NodeAddresses::collect(
///     &[Vehicle::new("car", "Home", 2)],
///     &[Stop::new("ana", "Office"), Stop::new("ben", "Park")],
///     &Location::new("work", "Office"),
/// );
/// assert_eq!(addresses.distinct(), ["Home", "Office", "Park"]);
/// assert_eq!(addresses.node_count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAddresses {
    distinct: Vec<String>,
    slots: Vec<usize>,
}

impl NodeAddresses {
    /// Gather addresses in node order: origins, stops, destination.
    #[must_use]
    pub fn collect(vehicles: &[Vehicle], stops: &[Stop], destination: &Location) -> Self {
        let nodes = vehicles
            .iter()
            .map(|vehicle| vehicle.origin.address.as_str())
            .chain(stops.iter().map(Stop::address))
            .chain(std::iter::once(destination.address.as_str()));

        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut distinct = Vec::new();
        let mut slots = Vec::new();
        for address in nodes {
            let slot = *positions.entry(address).or_insert_with(|| {
                distinct.push(address.to_owned());
                distinct.len() - 1
            });
            slots.push(slot);
        }
        Self { distinct, slots }
    }

    /// Addresses to hand to a provider, first occurrence first.
    #[must_use]
    pub fn distinct(&self) -> &[String] {
        &self.distinct
    }

    /// Number of nodes the expanded table covers.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.slots.len()
    }

    /// Expand a table over [`distinct`](Self::distinct) into node order.
    ///
    /// Nodes sharing an address are zero distance apart.
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::DimensionMismatch`] when `table` is not
    /// `distinct().len()` square.
    pub fn expand(&self, table: &[Vec<i64>]) -> Result<DistanceTable, DistanceError> {
        let expected = self.distinct.len();
        if table.len() != expected || table.iter().any(|row| row.len() != expected) {
            return Err(DistanceError::DimensionMismatch {
                expected,
                rows: table.len(),
            });
        }
        let expanded = self
            .slots
            .iter()
            .map(|&from| {
                self.slots
                    .iter()
                    .map(|&to| {
                        table
                            .get(from)
                            .and_then(|row| row.get(to))
                            .copied()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();
        Ok(expanded)
    }
}

/// Resolve a node-ordered [`DistanceTable`] for a problem's entities.
///
/// Calls `provider` once with the distinct addresses and expands the answer.
///
/// # Errors
///
/// Propagates provider errors and returns
/// [`DistanceError::DimensionMismatch`] for a misshapen answer.
pub fn resolve_distance_table<P>(
    provider: &P,
    vehicles: &[Vehicle],
    stops: &[Stop],
    destination: &Location,
) -> Result<DistanceTable, DistanceError>
where
    P: DistanceProvider + ?Sized,
{
    let addresses = NodeAddresses::collect(vehicles, stops, destination);
    log::debug!(
        "resolving {} distinct addresses for {} nodes",
        addresses.distinct().len(),
        addresses.node_count()
    );
    let table = provider.resolve_matrix(addresses.distinct())?;
    addresses.expand(&table)
}
