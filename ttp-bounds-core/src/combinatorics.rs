//! Subset enumeration over small node sets.
//!
//! Subsets are encoded as bit masks over positions in a caller-owned slice, so
//! at most [`MAX_SUBSET_ITEMS`] items can be enumerated.

use std::iter::FusedIterator;

/// Largest item count whose subsets fit in a `u64` mask.
pub const MAX_SUBSET_ITEMS: usize = 63;

/// A subset of `items`, as a bit mask over item positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubsetMask(u64);

impl SubsetMask {
    /// Whether the item at `position` is a member.
    #[must_use]
    pub const fn contains(self, position: usize) -> bool {
        position < MAX_SUBSET_ITEMS && self.0 & (1_u64 << position) != 0
    }

    /// Members of the subset, in slice order.
    pub fn members<'a, T>(self, items: &'a [T]) -> impl Iterator<Item = &'a T> + 'a {
        items
            .iter()
            .enumerate()
            .filter(move |(position, _)| self.contains(*position))
            .map(|(_, item)| item)
    }
}

/// Iterator over every non-empty subset of `n` items.
///
/// Yields `2^n - 1` masks in increasing numeric order, so singletons of early
/// items come first and the full set comes last.
///
/// # Examples
///
/// ```
/// use ttp_bounds_core::combinatorics::NonEmptySubsets;
///
/// let teams = [4, 7, 9];
/// let subsets: Vec<Vec<u32>> = NonEmptySubsets::new(teams.len())
///     .expect("three items fit in a mask")
///     .map(|mask| mask.members(&teams).copied().collect())
///     .collect();
/// assert_eq!(subsets.len(), 7);
/// assert_eq!(subsets.first(), Some(&vec![4]));
/// assert_eq!(subsets.last(), Some(&vec![4, 7, 9]));
/// ```
#[derive(Debug, Clone)]
pub struct NonEmptySubsets {
    next: u64,
    end: u64,
}

impl NonEmptySubsets {
    /// Enumerate the subsets of `n` items, or `None` when `n` exceeds
    /// [`MAX_SUBSET_ITEMS`].
    #[must_use]
    pub const fn new(n: usize) -> Option<Self> {
        if n > MAX_SUBSET_ITEMS {
            return None;
        }
        Some(Self {
            next: 1,
            end: 1_u64 << n,
        })
    }

    /// Number of subsets still to be yielded.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.end.saturating_sub(self.next)
    }
}

impl Iterator for NonEmptySubsets {
    type Item = SubsetMask;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let mask = SubsetMask(self.next);
        self.next += 1;
        Some(mask)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining()).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}

impl FusedIterator for NonEmptySubsets {}
