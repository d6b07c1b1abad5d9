//! Carpool routing heuristics.
//!
//! This crate provides [`InsertionSolver`], the default implementation of the
//! [`Solver`](carpool_core::Solver) trait. Stops are first placed by
//! capacity-gated cheapest insertion ([`construct`]), then refined by a
//! first-improvement local search over 2-opt, relocation and swap moves
//! ([`improve`]). [`report`] turns the result back into caller identifiers.
//!
//! Everything here is single threaded and deterministic: identical input
//! and budget always give identical output.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod construct;
mod cost;
mod improve;
mod report;
mod solver;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use construct::{ConstructionError, construct};
pub use improve::{
    PlateauRule, SearchBudget, SearchStats, StopReason, improve, improve_with_stats,
};
pub use report::{RouteReport, SolutionReport, report};
pub use solver::{
    DEFAULT_ITERATIONS_PER_STOP, InsertionSolver, InsertionSolverConfig, solve_problem,
};
