//! Distance provider trait.

use crate::DistanceTable;

use super::error::DistanceError;

/// Fetch pairwise distances for a list of distinct addresses.
///
/// Implementers must return a square `n×n` table where
/// `n == addresses.len()`. `table[i][j]` is the distance from `addresses[i]`
/// to `addresses[j]`. Entries are signed so malformed upstream data reaches
/// [`RoutingProblem::build`](crate::RoutingProblem::build) and is rejected
/// there rather than being silently clamped.
///
/// # Examples
///
/// ```rust
/// use carpool_core::{DistanceError, DistanceProvider, DistanceTable};
///
/// struct UnitProvider;
///
/// impl DistanceProvider for UnitProvider {
///     fn resolve_matrix(&self, addresses: &[String]) -> Result<DistanceTable, DistanceError> {
///         if addresses.is_empty() {
///             return Err(DistanceError::EmptyInput);
///         }
///         let n = addresses.len();
///         Ok((0..n)
///             .map(|i| (0..n).map(|j| i64::from(i != j)).collect())
///             .collect())
///     }
/// }
///
/// let table = UnitProvider.resolve_matrix(&["A".to_owned(), "B".to_owned()])?;
/// assert_eq!(table, vec![vec![0, 1], vec![1, 0]]);
/// # Ok::<(), DistanceError>(())
/// ```
pub trait DistanceProvider {
    /// Return a distance table for `addresses`.
    ///
    /// Implementations must return `Err(DistanceError::EmptyInput)` when
    /// `addresses` is empty.
    fn resolve_matrix(&self, addresses: &[String]) -> Result<DistanceTable, DistanceError>;
}

impl<P: DistanceProvider + ?Sized> DistanceProvider for &P {
    fn resolve_matrix(&self, addresses: &[String]) -> Result<DistanceTable, DistanceError> {
        (**self).resolve_matrix(addresses)
    }
}

impl<P: DistanceProvider + ?Sized> DistanceProvider for Box<P> {
    fn resolve_matrix(&self, addresses: &[String]) -> Result<DistanceTable, DistanceError> {
        (**self).resolve_matrix(addresses)
    }
}
