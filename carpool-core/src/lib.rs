//! Core domain types for the carpool routing engine.
//!
//! The crate models a one-shot capacitated routing problem: several drivers,
//! each starting at home, collect passengers and converge on one shared
//! destination. [`RoutingProblem::build`] validates raw entities and a
//! distance table; [`Solution`] holds one [`Route`] per vehicle. The
//! [`Solver`] trait and its request/response types form the contract used by
//! callers, while [`DistanceProvider`] abstracts the mapping service that
//! resolves addresses to distances.

#![forbid(unsafe_code)]

pub mod distance;
mod location;
mod matrix;
mod problem;
mod solution;
mod solver;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use distance::{
    CachingDistanceProvider, DistanceError, DistanceProvider, NodeAddresses,
    StaticDistanceProvider, resolve_distance_table,
};
pub use location::{Location, Stop, Vehicle};
pub use matrix::{Distance, DistanceMatrix, DistanceTable, MatrixError, NodeIndex};
pub use problem::{Node, ProblemError, RoutingProblem};
pub use solution::{Route, Solution, SolutionViolation};
pub use solver::{
    DESTINATION_ID, Error, ErrorBody, ErrorKind, RouteDescription, SolveError, SolveRequest,
    SolveResponse, Solver, StopRequest, VehicleRequest,
};
