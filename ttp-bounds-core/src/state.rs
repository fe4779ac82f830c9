//! Where a team stands and which opponents it still has to visit.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::{DistanceMatrix, Team, TripConstraints};

/// Errors returned by [`TourState::new`] and [`TourState::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourStateError {
    /// An away team was listed more than once.
    #[error("away team {team} is listed more than once")]
    DuplicateAwayTeam {
        /// The repeated team.
        team: Team,
    },
    /// The home team cannot be visited away.
    #[error("home team {home} appears in its own away set")]
    HomeInAwaySet {
        /// The home team.
        home: Team,
    },
    /// The venue the team stands at is already visited.
    #[error("current position {position} appears in the away set")]
    PositionInAwaySet {
        /// The current venue.
        position: Team,
    },
    /// A team index lies outside the distance matrix.
    #[error("team {team} is outside the {size}x{size} distance matrix")]
    TeamOutOfRange {
        /// The offending index.
        team: Team,
        /// Number of venues covered by the matrix.
        size: usize,
    },
    /// The team is away but the constraints report no open trip.
    #[error("team is away at {position} but the away streak is zero")]
    AwayWithoutStreak {
        /// The current venue.
        position: Team,
    },
    /// The team is at home but the constraints report an open trip.
    #[error("team is at home but the away streak is {streak}")]
    HomeWithStreak {
        /// The reported streak.
        streak: usize,
    },
}

/// A team's position within the tournament and its remaining away games.
///
/// # Examples
///
/// ```
/// use ttp_bounds_core::TourState;
///
/// # fn main() -> Result<(), ttp_bounds_core::TourStateError> {
/// let state = TourState::new(0, 2, [1, 3])?;
/// assert!(state.is_away());
/// assert_eq!(state.away_teams(), &[1, 3]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourState {
    home: Team,
    position: Team,
    away_teams: Vec<Team>,
}

impl TourState {
    /// Validates and constructs a [`TourState`].
    ///
    /// The away teams keep the order they were supplied in. Duplicates, the
    /// home team or the current position in the away set are rejected.
    pub fn new<I>(home: Team, position: Team, away_teams: I) -> Result<Self, TourStateError>
    where
        I: IntoIterator<Item = Team>,
    {
        let away_teams: Vec<Team> = away_teams.into_iter().collect();
        let mut seen = BTreeSet::new();
        for &team in &away_teams {
            if !seen.insert(team) {
                return Err(TourStateError::DuplicateAwayTeam { team });
            }
        }
        if seen.contains(&home) {
            return Err(TourStateError::HomeInAwaySet { home });
        }
        if position != home && seen.contains(&position) {
            return Err(TourStateError::PositionInAwaySet { position });
        }
        Ok(Self {
            home,
            position,
            away_teams,
        })
    }

    /// The team whose travel is bounded; the depot of every trip.
    #[must_use]
    pub const fn home(&self) -> Team {
        self.home
    }

    /// The venue the team currently occupies.
    #[must_use]
    pub const fn position(&self) -> Team {
        self.position
    }

    /// Opponents still to be visited away.
    #[must_use]
    pub fn away_teams(&self) -> &[Team] {
        &self.away_teams
    }

    /// Whether the team currently stands at an away venue.
    #[must_use]
    pub const fn is_away(&self) -> bool {
        self.position != self.home
    }

    /// Check the state against a distance matrix and trip rules.
    pub fn validate(
        &self,
        distances: &DistanceMatrix,
        constraints: &TripConstraints,
    ) -> Result<(), TourStateError> {
        let size = distances.len();
        let indices = [self.home, self.position]
            .into_iter()
            .chain(self.away_teams.iter().copied());
        for team in indices {
            if !distances.covers(team) {
                return Err(TourStateError::TeamOutOfRange { team, size });
            }
        }
        if self.is_away() && constraints.streak() == 0 {
            return Err(TourStateError::AwayWithoutStreak {
                position: self.position,
            });
        }
        if !self.is_away() && constraints.streak() > 0 {
            return Err(TourStateError::HomeWithStreak {
                streak: constraints.streak(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn matrix() -> DistanceMatrix {
        DistanceMatrix::from_fn(4, |a, b| u32::from(a != b)).expect("non-empty matrix")
    }

    #[rstest]
    fn rejects_duplicate_away_team() {
        assert_eq!(
            TourState::new(0, 0, [1, 2, 1]),
            Err(TourStateError::DuplicateAwayTeam { team: 1 })
        );
    }

    #[rstest]
    fn rejects_home_in_away_set() {
        assert_eq!(
            TourState::new(0, 0, [1, 0]),
            Err(TourStateError::HomeInAwaySet { home: 0 })
        );
    }

    #[rstest]
    fn rejects_position_in_away_set() {
        assert_eq!(
            TourState::new(0, 2, [1, 2]),
            Err(TourStateError::PositionInAwaySet { position: 2 })
        );
    }

    #[rstest]
    fn rejects_indices_outside_matrix(matrix: DistanceMatrix) {
        let state = TourState::new(0, 0, [1, 7]).expect("well-formed state");
        let rules = TripConstraints::new(2, 0, 2, 0).expect("valid rules");
        assert_eq!(
            state.validate(&matrix, &rules),
            Err(TourStateError::TeamOutOfRange { team: 7, size: 4 })
        );
    }

    #[rstest]
    #[case(0, 1, Err(TourStateError::HomeWithStreak { streak: 1 }))]
    #[case(3, 0, Err(TourStateError::AwayWithoutStreak { position: 3 }))]
    #[case(3, 2, Ok(()))]
    #[case(0, 0, Ok(()))]
    fn streak_must_match_position(
        matrix: DistanceMatrix,
        #[case] position: Team,
        #[case] streak: usize,
        #[case] expected: Result<(), TourStateError>,
    ) {
        let state = TourState::new(0, position, [1, 2]).expect("well-formed state");
        let rules = TripConstraints::new(3, 0, 3, streak).expect("valid rules");
        assert_eq!(state.validate(&matrix, &rules), expected);
    }
}
