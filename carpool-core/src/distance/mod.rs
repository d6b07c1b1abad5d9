//! Resolve distances between addresses.
//!
//! The [`DistanceProvider`] trait abstracts the mapping service that turns
//! addresses into a pairwise [`DistanceTable`](crate::DistanceTable). The
//! solver never calls a provider: callers resolve the table up front (see
//! [`resolve_distance_table`]) and hand it to
//! [`RoutingProblem::build`](crate::RoutingProblem::build).

mod addresses;
mod cache;
mod error;
mod provider;
mod static_table;

pub use addresses::{NodeAddresses, resolve_distance_table};
pub use cache::CachingDistanceProvider;
pub use error::DistanceError;
pub use provider::DistanceProvider;
pub use static_table::StaticDistanceProvider;
