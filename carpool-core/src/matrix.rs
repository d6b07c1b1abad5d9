//! Dense pairwise distance storage.
//!
//! Providers and callers exchange distances as a [`DistanceTable`] of signed
//! integers so malformed input (negative entries) can be represented and
//! rejected. Once validated, distances live in a [`DistanceMatrix`]: one flat
//! allocation sized at construction and never grown or mutated afterwards.

use thiserror::Error;

/// A non-negative travel distance in metres (or seconds for duration metrics).
pub type Distance = u64;

/// Row-major table of raw pairwise distances, as produced by a provider.
pub type DistanceTable = Vec<Vec<i64>>;

/// Stable position of a node (origin, stop, or destination) in the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Wrap a raw row/column index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The raw row/column index.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Reasons a distance table cannot back a routing problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// The table has the wrong number of rows for the node set.
    #[error("distance matrix has {actual} rows but {expected} nodes are required")]
    WrongSize {
        /// Rows required by the node set.
        expected: usize,
        /// Rows supplied.
        actual: usize,
    },
    /// A row length differs from the row count.
    #[error("row {row} has {len} columns but {expected} expected (matrix must be square)")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Columns in that row.
        len: usize,
        /// Required column count.
        expected: usize,
    },
    /// A distance was below zero.
    #[error("distance from node {from} to node {to} is negative ({value})")]
    Negative {
        /// Source node.
        from: usize,
        /// Target node.
        to: usize,
        /// Offending value.
        value: i64,
    },
    /// A node is a non-zero distance from itself.
    #[error("distance from node {node} to itself must be zero, found {value}")]
    NonZeroDiagonal {
        /// Offending node.
        node: usize,
        /// Offending value.
        value: i64,
    },
    /// A solution total could exceed [`Distance::MAX`].
    #[error("{arcs} arcs of up to {longest} each would overflow the total distance")]
    TotalOverflow {
        /// Arcs driven by a complete solution.
        arcs: usize,
        /// Longest single distance in the matrix.
        longest: Distance,
    },
}

/// Validated, immutable square matrix of [`Distance`] values.
///
/// Not required to be symmetric: directed road distances are legitimate.
///
/// # Examples
/// ```
/// use carpool_core::{DistanceMatrix, NodeIndex};
///
/// let matrix = DistanceMatrix::try_from_table(&[vec![0, 7], vec![9, 0]])?;
/// assert_eq!(matrix.size(), 2);
/// assert_eq!(matrix.get(NodeIndex::new(0), NodeIndex::new(1)), 7);
/// assert_eq!(matrix.get(NodeIndex::new(1), NodeIndex::new(0)), 9);
/// # Ok::<(), carpool_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    size: usize,
    cells: Box<[Distance]>,
}

impl DistanceMatrix {
    /// Validate `table` and copy it into a dense matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::NotSquare`] for ragged or rectangular input,
    /// [`MatrixError::Negative`] for entries below zero and
    /// [`MatrixError::NonZeroDiagonal`] when `table[i][i] != 0`.
    pub fn try_from_table(table: &[Vec<i64>]) -> Result<Self, MatrixError> {
        let size = table.len();
        let mut cells = Vec::with_capacity(size.saturating_mul(size));
        for (from, row) in table.iter().enumerate() {
            if row.len() != size {
                return Err(MatrixError::NotSquare {
                    row: from,
                    len: row.len(),
                    expected: size,
                });
            }
            for (to, &value) in row.iter().enumerate() {
                let distance = Distance::try_from(value).map_err(|_| MatrixError::Negative {
                    from,
                    to,
                    value,
                })?;
                if from == to && distance != 0 {
                    return Err(MatrixError::NonZeroDiagonal { node: from, value });
                }
                cells.push(distance);
            }
        }
        Ok(Self {
            size,
            cells: cells.into_boxed_slice(),
        })
    }

    /// Number of nodes (rows and columns).
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Longest single distance, or 0 for an empty matrix.
    #[must_use]
    pub fn longest(&self) -> Distance {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Distance from `from` to `to`.
    ///
    /// Node indices handed out by a [`RoutingProblem`](crate::RoutingProblem)
    /// are always in range. An out-of-range lookup logs a warning and yields
    /// [`Distance::MAX`] so the pair is never preferred.
    #[must_use]
    pub fn get(&self, from: NodeIndex, to: NodeIndex) -> Distance {
        let cell = (from.get() < self.size && to.get() < self.size)
            .then(|| from.get() * self.size + to.get())
            .and_then(|offset| self.cells.get(offset).copied());
        cell.unwrap_or_else(|| {
            log::warn!(
                "distance lookup out of range: from={} to={} size={}",
                from.get(),
                to.get(),
                self.size
            );
            debug_assert!(
                false,
                "distance lookup out of range: from={} to={}",
                from.get(),
                to.get()
            );
            Distance::MAX
        })
    }
}
