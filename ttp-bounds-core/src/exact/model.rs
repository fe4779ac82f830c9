//! Candidate edges and the binary program over them.

use crate::combinatorics::NonEmptySubsets;
use crate::exact::program::{BinaryProgram, LinearConstraint, Relation, VariableId};
use crate::{Distance, DistanceMatrix, Team, TourState, TripConstraints};

/// Role of a candidate edge in the tour model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Home to an away venue.
    Outbound,
    /// Away venue back home.
    Inbound,
    /// Between two away venues.
    Transfer,
    /// Zero-cost home to current venue, standing in for the travelled leg.
    Wrap,
    /// Current venue straight back home.
    Return,
    /// Current venue on to an away venue.
    Continuation,
}

/// A directed edge the solver may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateEdge {
    /// Tail of the edge.
    pub from: Team,
    /// Head of the edge.
    pub to: Team,
    /// Travel cost; zero for [`EdgeKind::Wrap`].
    pub cost: Distance,
    /// Role of the edge.
    pub kind: EdgeKind,
}

/// Enumerate every edge the tour may use.
///
/// The only edge entering the current venue is the wrap edge, so an open
/// trip always resumes where the team stands.
#[must_use]
pub fn candidate_edges(distances: &DistanceMatrix, state: &TourState) -> Vec<CandidateEdge> {
    let home = state.home();
    let away = state.away_teams();
    let mut edges = Vec::with_capacity(2 * away.len() + away.len() * away.len() + 2);
    let mut push = |from: Team, to: Team, kind: EdgeKind| {
        let cost = if kind == EdgeKind::Wrap {
            0
        } else {
            distances.cost(from, to)
        };
        edges.push(CandidateEdge {
            from,
            to,
            cost,
            kind,
        });
    };

    if state.is_away() {
        let position = state.position();
        push(home, position, EdgeKind::Wrap);
        push(position, home, EdgeKind::Return);
        for &team in away {
            push(position, team, EdgeKind::Continuation);
        }
    }
    for &team in away {
        push(home, team, EdgeKind::Outbound);
        push(team, home, EdgeKind::Inbound);
    }
    for &from in away {
        for &to in away.iter().filter(|&&to| to != from) {
            push(from, to, EdgeKind::Transfer);
        }
    }
    edges
}

/// Nodes that must be entered and left exactly once.
///
/// When the team is away its current venue leads the list.
#[must_use]
pub fn away_nodes(state: &TourState) -> Vec<Team> {
    let position = state.is_away().then_some(state.position());
    position
        .into_iter()
        .chain(state.away_teams().iter().copied())
        .collect()
}

/// Edge set, variables and constraints of one tour model.
#[derive(Debug, Clone)]
pub struct TourModel {
    home: Team,
    position: Option<Team>,
    capacity: usize,
    streak: usize,
    nodes: Vec<Team>,
    edges: Vec<CandidateEdge>,
    program: BinaryProgram,
    variables: Vec<VariableId>,
}

impl TourModel {
    /// Build the variables, degree constraints and depot bounds.
    #[must_use]
    pub fn new(
        distances: &DistanceMatrix,
        state: &TourState,
        constraints: &TripConstraints,
    ) -> Self {
        let edges = candidate_edges(distances, state);
        let mut program = BinaryProgram::new();
        let variables = edges
            .iter()
            .map(|edge| {
                program.add_variable(format!("x_{}_{}", edge.from, edge.to), f64::from(edge.cost))
            })
            .collect();
        let mut model = Self {
            home: state.home(),
            position: state.is_away().then_some(state.position()),
            capacity: constraints.capacity(),
            streak: constraints.streak(),
            nodes: away_nodes(state),
            edges,
            program,
            variables,
        };
        model.add_degree_constraints();
        model.add_depot_bounds(constraints);
        model
    }

    /// Nodes that must be visited exactly once, current venue first.
    #[must_use]
    pub fn nodes(&self) -> &[Team] {
        &self.nodes
    }

    /// Candidate edges, indexed like the program's variables.
    #[must_use]
    pub fn edges(&self) -> &[CandidateEdge] {
        &self.edges
    }

    /// The program built so far.
    #[must_use]
    pub const fn program(&self) -> &BinaryProgram {
        &self.program
    }

    /// Add the capacity cut of every non-empty subset of [`Self::nodes`].
    ///
    /// Returns `None` when the node count does not fit a subset mask.
    pub fn add_all_capacity_cuts(&mut self) -> Option<usize> {
        let subsets = NonEmptySubsets::new(self.nodes.len())?;
        let mut added = 0;
        for mask in subsets {
            let members: Vec<Team> = mask.members(&self.nodes).copied().collect();
            let cut = self.capacity_cut(&members);
            self.program.add_constraint(cut);
            added += 1;
        }
        Some(added)
    }

    /// Add the capacity cut of one subset.
    pub fn add_capacity_cut(&mut self, subset: &[Team]) {
        let cut = self.capacity_cut(subset);
        self.program.add_constraint(cut);
    }

    /// Capacity cut for `subset`: its boundary must be crossed at least twice
    /// per trip needed to serve it.
    ///
    /// The current venue weighs as the games already played on the open trip.
    #[must_use]
    pub fn capacity_cut(&self, subset: &[Team]) -> LinearConstraint {
        let inside = |team: Team| subset.contains(&team);
        let terms = self
            .edges
            .iter()
            .zip(&self.variables)
            .filter(|(edge, _)| inside(edge.from) != inside(edge.to))
            .map(|(_, &variable)| (variable, 1.0))
            .collect();
        let load = self.subset_load(subset);
        let trips = load.div_ceil(self.capacity);
        LinearConstraint {
            name: format!("capacity_{subset:?}"),
            terms,
            relation: Relation::AtLeast,
            rhs: trip_crossings(trips),
        }
    }

    /// Away games `subset` contributes to the trips that serve it.
    #[must_use]
    pub fn subset_load(&self, subset: &[Team]) -> usize {
        let holds_position = self.position.is_some_and(|position| subset.contains(&position));
        if holds_position {
            subset.len() + self.streak.saturating_sub(1)
        } else {
            subset.len()
        }
    }

    /// Node sets of solved cycles that break a capacity cut.
    ///
    /// A cycle that misses home breaks the cut of its own nodes, as does a
    /// trip from home that carries more than a trip's capacity.
    #[must_use]
    pub fn violated_subsets(&self, cycles: &[Vec<Team>]) -> Vec<Vec<Team>> {
        cycles
            .iter()
            .filter_map(|cycle| match cycle.split_first() {
                Some((&first, stops)) if first == self.home => {
                    (self.subset_load(stops) > self.capacity).then(|| stops.to_vec())
                }
                _ => Some(cycle.clone()),
            })
            .collect()
    }

    /// Edges whose variable is set in `values`.
    pub fn selected_edges<'a>(
        &'a self,
        values: &'a [f64],
    ) -> impl Iterator<Item = &'a CandidateEdge> + 'a {
        self.edges
            .iter()
            .zip(&self.variables)
            .filter(move |(_, variable)| {
                values
                    .get(variable.index())
                    .is_some_and(|&value| value > 0.5)
            })
            .map(|(edge, _)| edge)
    }

    /// Home venue of the model.
    #[must_use]
    pub const fn home(&self) -> Team {
        self.home
    }

    /// Maximum away games per trip.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    fn add_degree_constraints(&mut self) {
        for &node in &self.nodes {
            let outgoing = self.terms_where(|edge| edge.from == node);
            let incoming = self.terms_where(|edge| edge.to == node);
            self.program.add_constraint(LinearConstraint {
                name: format!("out_{node}"),
                terms: outgoing,
                relation: Relation::Equal,
                rhs: 1.0,
            });
            self.program.add_constraint(LinearConstraint {
                name: format!("in_{node}"),
                terms: incoming,
                relation: Relation::Equal,
                rhs: 1.0,
            });
        }
    }

    fn add_depot_bounds(&mut self, constraints: &TripConstraints) {
        let home = self.home;
        let departures = self.terms_where(|edge| edge.from == home);
        self.program.add_constraint(LinearConstraint {
            name: "depot_min".to_owned(),
            terms: departures.clone(),
            relation: Relation::AtLeast,
            rhs: trip_count(constraints.min_trips()),
        });
        self.program.add_constraint(LinearConstraint {
            name: "depot_max".to_owned(),
            terms: departures,
            relation: Relation::AtMost,
            rhs: trip_count(constraints.max_trips()),
        });
    }

    fn terms_where<F>(&self, keep: F) -> Vec<(VariableId, f64)>
    where
        F: Fn(&CandidateEdge) -> bool,
    {
        self.edges
            .iter()
            .zip(&self.variables)
            .filter(|(edge, _)| keep(edge))
            .map(|(_, &variable)| (variable, 1.0))
            .collect()
    }
}

fn trip_count(trips: usize) -> f64 {
    f64::from(u32::try_from(trips).unwrap_or(u32::MAX))
}

fn trip_crossings(trips: usize) -> f64 {
    trip_count(trips.saturating_mul(2))
}
