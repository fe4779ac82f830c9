//! Trip-length and trip-count rules.

use thiserror::Error;

/// Errors returned by [`TripConstraints::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripConstraintsError {
    /// A trip must be allowed at least one away game.
    #[error("trip capacity must be at least 1")]
    ZeroCapacity,
    /// The trip-count range is empty.
    #[error("minimum trip count {min} exceeds maximum {max}")]
    InvertedTripBounds {
        /// Requested minimum number of trips.
        min: usize,
        /// Requested maximum number of trips.
        max: usize,
    },
    /// The open trip already holds more away games than a trip may.
    #[error("away streak {streak} exceeds trip capacity {capacity}")]
    StreakExceedsCapacity {
        /// Consecutive away games already played.
        streak: usize,
        /// Maximum away games per trip.
        capacity: usize,
    },
}

/// Scheduling rules limiting how a team may travel.
///
/// `capacity` is the maximum number of consecutive away games per trip, the
/// trip-count range bounds how many trips may cover the remaining away set,
/// and `streak` counts the away games already played on a trip that is still
/// open (zero when the team is at home).
///
/// # Examples
///
/// ```
/// use ttp_bounds_core::TripConstraints;
///
/// # fn main() -> Result<(), ttp_bounds_core::TripConstraintsError> {
/// let rules = TripConstraints::new(3, 1, 4, 0)?;
/// assert_eq!(rules.capacity(), 3);
/// assert!(!rules.continues_open_trip());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripConstraints {
    capacity: usize,
    min_trips: usize,
    max_trips: usize,
    streak: usize,
}

impl TripConstraints {
    /// Validates and constructs [`TripConstraints`].
    pub const fn new(
        capacity: usize,
        min_trips: usize,
        max_trips: usize,
        streak: usize,
    ) -> Result<Self, TripConstraintsError> {
        if capacity == 0 {
            return Err(TripConstraintsError::ZeroCapacity);
        }
        if min_trips > max_trips {
            return Err(TripConstraintsError::InvertedTripBounds {
                min: min_trips,
                max: max_trips,
            });
        }
        if streak > capacity {
            return Err(TripConstraintsError::StreakExceedsCapacity { streak, capacity });
        }
        Ok(Self {
            capacity,
            min_trips,
            max_trips,
            streak,
        })
    }

    /// Maximum number of consecutive away games per trip.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Minimum number of trips covering the away set.
    #[must_use]
    pub const fn min_trips(&self) -> usize {
        self.min_trips
    }

    /// Maximum number of trips covering the away set.
    #[must_use]
    pub const fn max_trips(&self) -> usize {
        self.max_trips
    }

    /// Away games already played on the open trip.
    #[must_use]
    pub const fn streak(&self) -> usize {
        self.streak
    }

    /// Whether an open trip still has room for another away game.
    #[must_use]
    pub const fn continues_open_trip(&self) -> bool {
        self.streak > 0 && self.streak < self.capacity
    }
}
