//! Test-only utilities for `carpool-solver`.
//!
//! The helpers in this module are available to unit tests and to downstream
//! crates enabling the `test-support` feature.

use carpool_core::{
    DistanceError, DistanceProvider, DistanceTable, Location, RoutingProblem, SolveRequest, Stop,
    StopRequest, Vehicle, VehicleRequest,
};

/// Build a problem whose nodes sit on a number line.
///
/// Vehicles are named `v0`, `v1`, … and stops `s0`, `s1`, …; every vehicle
/// gets `capacity` seats. Distances are absolute differences, so the table
/// is symmetric and metric.
///
/// # Panics
///
/// Panics when the fleet cannot cover the stops or a vehicle has no seats.
#[must_use]
#[expect(
    clippy::expect_used,
    reason = "test helper fails loudly on malformed fixtures"
)]
pub fn line_problem(origins: &[i64], stops: &[i64], destination: i64, capacity: u32) -> RoutingProblem {
    let positions: Vec<i64> = origins
        .iter()
        .chain(stops)
        .chain(std::iter::once(&destination))
        .copied()
        .collect();
    let table: DistanceTable = positions
        .iter()
        .map(|from| positions.iter().map(|to| (from - to).abs()).collect())
        .collect();
    RoutingProblem::build(
        origins
            .iter()
            .enumerate()
            .map(|(index, at)| Vehicle::new(format!("v{index}"), format!("origin@{at}"), capacity))
            .collect(),
        stops
            .iter()
            .enumerate()
            .map(|(index, at)| Stop::new(format!("s{index}"), format!("stop@{at}")))
            .collect(),
        Some(Location::new("destination", format!("destination@{destination}"))),
        &table,
    )
    .expect("line problem fixtures must be valid")
}

/// Build a request from `(id, address, capacity)` vehicles and
/// `(id, address)` stops.
#[must_use]
pub fn request(
    vehicles: &[(&str, &str, u32)],
    stops: &[(&str, &str)],
    destination: &str,
) -> SolveRequest {
    SolveRequest {
        vehicles: vehicles
            .iter()
            .map(|&(id, origin_address, capacity)| VehicleRequest {
                id: id.to_owned(),
                origin_address: origin_address.to_owned(),
                capacity,
            })
            .collect(),
        stops: stops
            .iter()
            .map(|&(id, address)| StopRequest {
                id: id.to_owned(),
                address: address.to_owned(),
            })
            .collect(),
        destination_address: Some(destination.to_owned()),
        budget: None,
    }
}

/// A [`DistanceProvider`] returning a fixed, pre-defined table.
///
/// The table is returned verbatim whatever the addresses, which makes golden
/// tests fully deterministic. The table must match the number of addresses
/// requested; mismatches produce [`DistanceError::DimensionMismatch`].
#[derive(Debug, Clone)]
pub struct FixedMatrixDistanceProvider {
    table: DistanceTable,
}

impl FixedMatrixDistanceProvider {
    /// Wrap `table`.
    #[must_use]
    pub const fn new(table: DistanceTable) -> Self {
        Self { table }
    }
}

impl DistanceProvider for FixedMatrixDistanceProvider {
    fn resolve_matrix(&self, addresses: &[String]) -> Result<DistanceTable, DistanceError> {
        if addresses.is_empty() {
            return Err(DistanceError::EmptyInput);
        }
        if self.table.len() != addresses.len() {
            return Err(DistanceError::DimensionMismatch {
                expected: addresses.len(),
                rows: self.table.len(),
            });
        }
        Ok(self.table.clone())
    }
}
