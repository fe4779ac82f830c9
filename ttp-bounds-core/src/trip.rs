//! Trips recovered from a solved model.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::{Cost, DistanceMatrix, Team, TourState, TripConstraints};

/// A cycle that leaves home, visits away venues in order, and returns home.
///
/// The node list starts with the home venue and does not repeat it at the
/// end. For the open trip the second node is the venue the team currently
/// stands at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trip {
    nodes: Vec<Team>,
}

impl Trip {
    /// Construct a trip from its node sequence, starting at home.
    #[must_use]
    pub const fn new(nodes: Vec<Team>) -> Self {
        Self { nodes }
    }

    /// Every node of the cycle, starting at home.
    #[must_use]
    pub fn nodes(&self) -> &[Team] {
        &self.nodes
    }

    /// Venues visited after leaving home.
    #[must_use]
    pub fn stops(&self) -> &[Team] {
        self.nodes.get(1..).unwrap_or_default()
    }

    /// Travel cost of the cycle, optionally skipping the leg out of home.
    fn cost(&self, distances: &DistanceMatrix, skip_first_leg: bool) -> Cost {
        let Some(&home) = self.nodes.first() else {
            return 0;
        };
        let legs = self
            .nodes
            .iter()
            .zip(self.nodes.iter().skip(1).chain(std::iter::once(&home)))
            .skip(usize::from(skip_first_leg));
        legs.map(|(&from, &to)| Cost::from(distances.cost(from, to)))
            .sum()
    }
}

/// Defects found by [`TripDecomposition::check`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecompositionDefect {
    /// An away team is not covered by any trip.
    #[error("away team {team} is not visited by any trip")]
    MissingTeam {
        /// The uncovered team.
        team: Team,
    },
    /// An away team is covered by more than one trip, or twice by one.
    #[error("away team {team} is visited more than once")]
    RepeatedTeam {
        /// The repeated team.
        team: Team,
    },
    /// A trip visits a venue that is not in the away set.
    #[error("venue {team} is visited but is not a remaining opponent")]
    UnexpectedTeam {
        /// The unexpected venue.
        team: Team,
    },
    /// A trip does not start at home.
    #[error("trip starts at {start} instead of home")]
    DetachedTrip {
        /// First node of the trip.
        start: Team,
    },
    /// A closed trip holds more away games than a trip may.
    #[error("closed trip visits {stops} teams but capacity is {capacity}")]
    TripOverCapacity {
        /// Away games on the trip.
        stops: usize,
        /// Maximum away games per trip.
        capacity: usize,
    },
    /// The open trip exceeds capacity once its streak is counted.
    #[error("open trip adds {stops} teams to a streak of {streak}, capacity is {capacity}")]
    OpenTripOverCapacity {
        /// New away games on the open trip.
        stops: usize,
        /// Away games already played on it.
        streak: usize,
        /// Maximum away games per trip.
        capacity: usize,
    },
    /// The open trip does not resume from the current venue.
    #[error("open trip does not continue from the current position {position}")]
    OpenTripMismatch {
        /// The current venue.
        position: Team,
    },
    /// Too few or too many trips.
    #[error("{trips} trips lie outside the allowed range [{min}, {max}]")]
    TripCountOutOfRange {
        /// Number of trips in the decomposition.
        trips: usize,
        /// Minimum number of trips.
        min: usize,
        /// Maximum number of trips.
        max: usize,
    },
}

/// The trips making up a solved tour.
///
/// `open` is the trip continuing the team's current away streak, if the team
/// is away; `closed` are fresh trips that start and end at home.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripDecomposition {
    /// Trip resuming from the current away venue.
    pub open: Option<Trip>,
    /// Trips starting and ending at home.
    pub closed: Vec<Trip>,
}

impl TripDecomposition {
    /// Number of trips, counting the open trip whenever it exists.
    ///
    /// An open trip that only returns home from the current venue still
    /// counts: the model reaches that venue through the wrap edge, which
    /// leaves home like any other trip and so uses one of the allowed trips.
    #[must_use]
    pub fn trip_count(&self) -> usize {
        self.closed.len() + usize::from(self.open.is_some())
    }

    /// Total travel cost of the decomposition.
    ///
    /// The open trip does not pay for the leg from home to the current venue,
    /// which was travelled before the bound was requested.
    #[must_use]
    pub fn cost(&self, distances: &DistanceMatrix) -> Cost {
        let open = self
            .open
            .as_ref()
            .map_or(0, |trip| trip.cost(distances, true));
        let closed: Cost = self
            .closed
            .iter()
            .map(|trip| trip.cost(distances, false))
            .sum();
        open + closed
    }

    /// Verify the decomposition covers the away set within the trip rules.
    pub fn check(
        &self,
        state: &TourState,
        constraints: &TripConstraints,
    ) -> Result<(), DecompositionDefect> {
        let home = state.home();
        let mut visits: BTreeMap<Team, usize> = state
            .away_teams()
            .iter()
            .map(|&team| (team, 0))
            .collect();

        if let Some(open) = &self.open {
            check_starts_at_home(open, home)?;
            let (first, rest) = open.stops().split_first().map_or((None, &[][..]), |(f, r)| {
                (Some(*f), r)
            });
            if first != Some(state.position()) {
                return Err(DecompositionDefect::OpenTripMismatch {
                    position: state.position(),
                });
            }
            if rest.len() + constraints.streak() > constraints.capacity() {
                return Err(DecompositionDefect::OpenTripOverCapacity {
                    stops: rest.len(),
                    streak: constraints.streak(),
                    capacity: constraints.capacity(),
                });
            }
            count_visits(&mut visits, rest)?;
        }

        for trip in &self.closed {
            check_starts_at_home(trip, home)?;
            if trip.stops().len() > constraints.capacity() {
                return Err(DecompositionDefect::TripOverCapacity {
                    stops: trip.stops().len(),
                    capacity: constraints.capacity(),
                });
            }
            count_visits(&mut visits, trip.stops())?;
        }

        if let Some((&team, _)) = visits.iter().find(|(_, count)| **count == 0) {
            return Err(DecompositionDefect::MissingTeam { team });
        }

        let trips = self.trip_count();
        if trips < constraints.min_trips() || trips > constraints.max_trips() {
            return Err(DecompositionDefect::TripCountOutOfRange {
                trips,
                min: constraints.min_trips(),
                max: constraints.max_trips(),
            });
        }
        Ok(())
    }
}

fn check_starts_at_home(trip: &Trip, home: Team) -> Result<(), DecompositionDefect> {
    match trip.nodes().first() {
        Some(&start) if start == home => Ok(()),
        Some(&start) => Err(DecompositionDefect::DetachedTrip { start }),
        None => Err(DecompositionDefect::DetachedTrip { start: home }),
    }
}

fn count_visits(
    visits: &mut BTreeMap<Team, usize>,
    stops: &[Team],
) -> Result<(), DecompositionDefect> {
    for &team in stops {
        let Some(count) = visits.get_mut(&team) else {
            return Err(DecompositionDefect::UnexpectedTeam { team });
        };
        *count += 1;
        if *count > 1 {
            return Err(DecompositionDefect::RepeatedTeam { team });
        }
    }
    Ok(())
}
