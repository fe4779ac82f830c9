//! Travel distances between venues.

use thiserror::Error;

/// Index of a team, and therefore of its home venue, in a [`DistanceMatrix`].
pub type Team = usize;

/// Travel cost of a single leg between two venues.
pub type Distance = u32;

/// Accumulated travel cost over several legs.
pub type Cost = u64;

/// Errors returned by [`DistanceMatrix::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistanceMatrixError {
    /// No rows were supplied.
    #[error("distance matrix must contain at least one venue")]
    Empty,
    /// A row length differs from the number of rows.
    #[error("distance matrix row {row} has {len} entries, expected {expected}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Length of that row.
        len: usize,
        /// Number of rows in the matrix.
        expected: usize,
    },
}

/// Square matrix of non-negative travel costs.
///
/// `matrix.get(a, b)` is the cost of travelling from venue `a` to venue `b`.
/// The matrix need not be symmetric.
///
/// # Examples
///
/// ```
/// use ttp_bounds_core::DistanceMatrix;
///
/// # fn main() -> Result<(), ttp_bounds_core::DistanceMatrixError> {
/// let matrix = DistanceMatrix::new(vec![vec![0, 3], vec![4, 0]])?;
/// assert_eq!(matrix.get(0, 1), Some(3));
/// assert_eq!(matrix.get(1, 0), Some(4));
/// assert_eq!(matrix.get(2, 0), None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    size: usize,
    entries: Vec<Distance>,
}

impl DistanceMatrix {
    /// Validates and constructs a [`DistanceMatrix`] from row-major rows.
    pub fn new(rows: Vec<Vec<Distance>>) -> Result<Self, DistanceMatrixError> {
        let size = rows.len();
        if size == 0 {
            return Err(DistanceMatrixError::Empty);
        }
        let mut entries = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(DistanceMatrixError::NotSquare {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            entries.extend(values);
        }
        Ok(Self { size, entries })
    }

    /// Build a matrix by evaluating `cost(from, to)` for every pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use ttp_bounds_core::DistanceMatrix;
    ///
    /// # fn main() -> Result<(), ttp_bounds_core::DistanceMatrixError> {
    /// let line = DistanceMatrix::from_fn(3, |a, b| u32::try_from(a.abs_diff(b)).unwrap_or(0))?;
    /// assert_eq!(line.get(0, 2), Some(2));
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_fn<F>(size: usize, mut cost: F) -> Result<Self, DistanceMatrixError>
    where
        F: FnMut(Team, Team) -> Distance,
    {
        if size == 0 {
            return Err(DistanceMatrixError::Empty);
        }
        let entries = (0..size)
            .flat_map(|from| (0..size).map(move |to| (from, to)))
            .map(|(from, to)| cost(from, to))
            .collect();
        Ok(Self { size, entries })
    }

    /// Number of venues covered by the matrix.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Always `false`; construction rejects empty matrices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Whether `team` indexes a row of the matrix.
    #[must_use]
    pub const fn covers(&self, team: Team) -> bool {
        team < self.size
    }

    /// Travel cost from `from` to `to`, or `None` when either is out of range.
    #[must_use]
    pub fn get(&self, from: Team, to: Team) -> Option<Distance> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.entries.get(from * self.size + to).copied()
    }

    /// Travel cost between two venues that callers have already validated.
    ///
    /// Out-of-range lookups are a programming error; they trip a debug
    /// assertion and evaluate to zero in release builds.
    pub(crate) fn cost(&self, from: Team, to: Team) -> Distance {
        let value = self.get(from, to);
        debug_assert!(
            value.is_some(),
            "distance lookup out of range: from={from}, to={to}, size={}",
            self.size
        );
        value.unwrap_or(0)
    }
}
