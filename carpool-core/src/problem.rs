//! The validated routing problem.
//!
//! A [`RoutingProblem`] fixes the node layout once: vehicle origins first,
//! then stops, then the shared destination. Every later stage addresses nodes
//! through [`NodeIndex`] values handed out here.

use std::collections::HashSet;

use thiserror::Error;

use crate::{Distance, DistanceMatrix, Location, MatrixError, NodeIndex, Stop, Vehicle};

/// Errors returned by [`RoutingProblem::build`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    /// No destination was supplied.
    #[error("a destination is required")]
    MissingDestination,
    /// No vehicle was supplied.
    #[error("at least one vehicle is required")]
    MissingVehicle,
    /// A vehicle cannot carry anyone.
    #[error("vehicle {vehicle} must have a capacity of at least 1")]
    InvalidCapacity {
        /// Offending vehicle identifier.
        vehicle: String,
    },
    /// Two vehicles, or two stops, share an identifier.
    #[error("identifier {id} is used more than once")]
    DuplicateIdentifier {
        /// The repeated identifier.
        id: String,
    },
    /// The fleet cannot carry every passenger.
    #[error("total capacity {capacity} cannot cover {stops} stops")]
    InfeasibleCapacity {
        /// Sum of vehicle capacities.
        capacity: u64,
        /// Number of stops requested.
        stops: usize,
    },
    /// The distance table does not describe the node set.
    #[error("invalid distance matrix: {0}")]
    InvalidDistanceMatrix(#[from] MatrixError),
}

/// What a [`NodeIndex`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// Origin of the vehicle at this position.
    Origin(usize),
    /// The stop at this position.
    Stop(usize),
    /// The shared destination.
    Destination,
}

/// Vehicles, stops, destination and distances for one solve.
///
/// Constructed once and read-only thereafter.
///
/// # Examples
/// ```
/// use carpool_core::{Location, RoutingProblem, Stop, Vehicle};
///
/// let problem = RoutingProblem::build(
///     vec![Vehicle::new("car", "Home", 1)],
///     vec![Stop::new("ana", "Ana's place")],
///     Some(Location::new("office", "Office")),
///     &[vec![0, 2, 9], vec![2, 0, 8], vec![9, 8, 0]],
/// )?;
/// assert_eq!(problem.node_count(), 3);
/// assert_eq!(problem.distance(problem.origin_node(0), problem.destination_node()), 9);
/// # Ok::<(), carpool_core::ProblemError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingProblem {
    vehicles: Vec<Vehicle>,
    stops: Vec<Stop>,
    destination: Location,
    matrix: DistanceMatrix,
}

impl RoutingProblem {
    /// Validate raw entities and assemble a solver-ready problem.
    ///
    /// `table` must be indexed in node order: one row per vehicle origin (in
    /// `vehicles` order), one per stop (in `stops` order), then the
    /// destination. An empty `stops` list is valid.
    ///
    /// # Errors
    ///
    /// Returns [`ProblemError::MissingDestination`],
    /// [`ProblemError::MissingVehicle`], [`ProblemError::InvalidCapacity`],
    /// [`ProblemError::DuplicateIdentifier`],
    /// [`ProblemError::InfeasibleCapacity`] or
    /// [`ProblemError::InvalidDistanceMatrix`], checked in that order.
    pub fn build(
        vehicles: Vec<Vehicle>,
        stops: Vec<Stop>,
        destination: Option<Location>,
        table: &[Vec<i64>],
    ) -> Result<Self, ProblemError> {
        Self::validate_entities(&vehicles, &stops, destination.as_ref())?;
        let destination = destination.ok_or(ProblemError::MissingDestination)?;
        let matrix = DistanceMatrix::try_from_table(table)?;
        Self::from_parts(vehicles, stops, destination, matrix)
    }

    /// Run every check of [`RoutingProblem::build`] that does not need
    /// distances.
    ///
    /// Callers resolving distances from a remote provider run this first so
    /// malformed requests never reach the provider.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`RoutingProblem::build`] except
    /// [`ProblemError::InvalidDistanceMatrix`].
    pub fn validate_entities(
        vehicles: &[Vehicle],
        stops: &[Stop],
        destination: Option<&Location>,
    ) -> Result<(), ProblemError> {
        if destination.is_none() {
            return Err(ProblemError::MissingDestination);
        }
        if vehicles.is_empty() {
            return Err(ProblemError::MissingVehicle);
        }
        if let Some(vehicle) = vehicles.iter().find(|vehicle| vehicle.capacity == 0) {
            return Err(ProblemError::InvalidCapacity {
                vehicle: vehicle.id.clone(),
            });
        }
        ensure_unique(vehicles.iter().map(|vehicle| vehicle.id.as_str()))?;
        ensure_unique(stops.iter().map(Stop::id))?;

        let capacity = total_capacity(vehicles);
        let required = u64::try_from(stops.len()).unwrap_or(u64::MAX);
        if capacity < required {
            return Err(ProblemError::InfeasibleCapacity {
                capacity,
                stops: stops.len(),
            });
        }
        Ok(())
    }

    /// Assemble a problem from already validated parts.
    ///
    /// Only the matrix dimension is checked; capacity coverage is not, so
    /// downstream stages must still guard against an under-provisioned fleet.
    ///
    /// # Errors
    ///
    /// Returns [`ProblemError::InvalidDistanceMatrix`] when the matrix size
    /// differs from the node count, or when a solution total could overflow
    /// [`Distance`].
    pub fn from_parts(
        vehicles: Vec<Vehicle>,
        stops: Vec<Stop>,
        destination: Location,
        matrix: DistanceMatrix,
    ) -> Result<Self, ProblemError> {
        let expected = vehicles.len() + stops.len() + 1;
        if matrix.size() != expected {
            return Err(MatrixError::WrongSize {
                expected,
                actual: matrix.size(),
            }
            .into());
        }
        // Every solution drives one arc per vehicle plus one per stop.
        let arcs = vehicles.len() + stops.len();
        let longest = matrix.longest();
        if Distance::try_from(arcs)
            .ok()
            .and_then(|count| count.checked_mul(longest))
            .is_none()
        {
            return Err(MatrixError::TotalOverflow { arcs, longest }.into());
        }
        Ok(Self {
            vehicles,
            stops,
            destination,
            matrix,
        })
    }

    /// Vehicles in node order.
    #[must_use]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Stops in node order.
    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// The shared destination.
    #[must_use]
    pub const fn destination(&self) -> &Location {
        &self.destination
    }

    /// The validated distance matrix.
    #[must_use]
    pub const fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    /// Number of rows/columns in the matrix.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.vehicles.len() + self.stops.len() + 1
    }

    /// Sum of all vehicle capacities.
    #[must_use]
    pub fn total_capacity(&self) -> u64 {
        total_capacity(&self.vehicles)
    }

    /// Capacity of the vehicle at `vehicle`, or zero if out of range.
    #[must_use]
    pub fn capacity(&self, vehicle: usize) -> u32 {
        self.vehicles.get(vehicle).map_or(0, |entry| entry.capacity)
    }

    /// Node of the origin of the vehicle at `vehicle`.
    #[must_use]
    pub const fn origin_node(&self, vehicle: usize) -> NodeIndex {
        NodeIndex::new(vehicle)
    }

    /// Node of the stop at `stop`.
    #[must_use]
    pub fn stop_node(&self, stop: usize) -> NodeIndex {
        NodeIndex::new(self.vehicles.len() + stop)
    }

    /// Node of the shared destination.
    #[must_use]
    pub fn destination_node(&self) -> NodeIndex {
        NodeIndex::new(self.vehicles.len() + self.stops.len())
    }

    /// Classify a node index.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<Node> {
        let raw = index.get();
        let vehicles = self.vehicles.len();
        let stops = self.stops.len();
        if raw < vehicles {
            Some(Node::Origin(raw))
        } else if raw < vehicles + stops {
            Some(Node::Stop(raw - vehicles))
        } else if raw == vehicles + stops {
            Some(Node::Destination)
        } else {
            None
        }
    }

    /// The location behind a node index.
    #[must_use]
    pub fn location(&self, index: NodeIndex) -> Option<&Location> {
        match self.node(index)? {
            Node::Origin(vehicle) => self.vehicles.get(vehicle).map(|entry| &entry.origin),
            Node::Stop(stop) => self.stops.get(stop).map(|entry| &entry.location),
            Node::Destination => Some(&self.destination),
        }
    }

    /// Directed distance between two nodes.
    #[must_use]
    pub fn distance(&self, from: NodeIndex, to: NodeIndex) -> Distance {
        self.matrix.get(from, to)
    }
}

fn total_capacity(vehicles: &[Vehicle]) -> u64 {
    vehicles
        .iter()
        .map(|vehicle| u64::from(vehicle.capacity))
        .sum()
}

fn ensure_unique<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), ProblemError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ProblemError::DuplicateIdentifier { id: id.to_owned() });
        }
    }
    Ok(())
}
