//! Facade crate for the carpool routing engine.
//!
//! This crate re-exports the core domain types and exposes the insertion
//! solver behind the `solver` feature flag.

#![forbid(unsafe_code)]

pub use carpool_core::{
    CachingDistanceProvider, DistanceError, DistanceProvider, ErrorBody, ErrorKind,
    RouteDescription, SolveError, SolveRequest, SolveResponse, Solver, StaticDistanceProvider,
    StopRequest, VehicleRequest,
};

#[cfg(feature = "solver")]
pub use carpool_solver::{InsertionSolver, InsertionSolverConfig, SolutionReport};
