//! Recover trips from a solved edge selection.

use crate::exact::model::CandidateEdge;
use crate::graph::{CycleError, DirectedGraph};
use crate::{BoundError, Team, TourState, Trip, TripDecomposition};

/// Split selected edges into simple cycles, hub cycles first.
pub fn selection_cycles<'a, I>(edges: I, state: &TourState) -> Result<Vec<Vec<Team>>, CycleError>
where
    I: IntoIterator<Item = &'a CandidateEdge>,
{
    let home = state.home();
    let mut graph = DirectedGraph::new(std::iter::once(home));
    for edge in edges {
        graph.add_arc(edge.from, edge.to);
    }
    graph.simple_cycles(home)
}

/// Turn the cycles of a final solution into trips.
///
/// The cycle through the current venue becomes the open trip. A cycle that
/// misses home means the solver returned an assignment outside the model.
pub fn decompose(
    cycles: Vec<Vec<Team>>,
    state: &TourState,
) -> Result<TripDecomposition, BoundError> {
    let mut decomposition = TripDecomposition::default();
    for cycle in cycles {
        if cycle.first() != Some(&state.home()) {
            return Err(BoundError::DetachedCycle { cycle });
        }
        let resumes_open_trip = state.is_away() && cycle.contains(&state.position());
        let trip = Trip::new(cycle);
        if resumes_open_trip {
            decomposition.open = Some(trip);
        } else {
            decomposition.closed.push(trip);
        }
    }
    Ok(decomposition)
}
