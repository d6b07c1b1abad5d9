//! Data access adapters for the carpool engine.
//!
//! Responsibilities:
//! - Provide [`carpool_core::DistanceProvider`] implementations backed by
//!   external services.
//! - Encapsulate wire formats of those services.
//!
//! Boundaries:
//! - Do not encode routing rules (live in `carpool-core` and
//!   `carpool-solver`).
//! - Never retry: upstream failures surface to the caller unchanged.
//!
//! Invariants:
//! - Thread-safe by default where feasible.
//! - No global mutable state.

pub mod routing;
