//! Cycle extraction from selected arcs.
//!
//! A solved routing model selects arcs so that every non-depot node has one
//! incoming and one outgoing arc, while the depot may have several. The arcs
//! therefore split into simple cycles: one per arc leaving the depot, plus
//! any subtours that never touch it.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::Team;

/// Errors returned by [`DirectedGraph::simple_cycles`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    /// A non-depot node has more than one incoming or outgoing arc.
    #[error("node {node} has more than one incoming or outgoing arc")]
    Branching {
        /// The offending node.
        node: Team,
    },
    /// A walk reached a node with no outgoing arc.
    #[error("walk stopped at node {node}, which has no outgoing arc")]
    DeadEnd {
        /// The node without a successor.
        node: Team,
    },
    /// A walk revisited a node before returning to its start.
    #[error("walk revisited node {node} before closing its cycle")]
    Tangled {
        /// The revisited node.
        node: Team,
    },
}

/// Directed graph over team nodes.
///
/// # Examples
///
/// ```
/// use ttp_bounds_core::graph::DirectedGraph;
///
/// let mut graph = DirectedGraph::new([0, 1, 2, 3]);
/// for (from, to) in [(0, 1), (1, 0), (0, 2), (2, 3), (3, 0)] {
///     graph.add_arc(from, to);
/// }
/// let cycles = graph.simple_cycles(0).expect("well-formed routing graph");
/// assert_eq!(cycles, vec![vec![0, 1], vec![0, 2, 3]]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectedGraph {
    nodes: BTreeSet<Team>,
    successors: BTreeMap<Team, Vec<Team>>,
    in_degree: BTreeMap<Team, usize>,
}

impl DirectedGraph {
    /// Create a graph over `nodes` with no arcs.
    pub fn new<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = Team>,
    {
        Self {
            nodes: nodes.into_iter().collect(),
            successors: BTreeMap::new(),
            in_degree: BTreeMap::new(),
        }
    }

    /// Add the arc `from -> to`, registering both endpoints as nodes.
    pub fn add_arc(&mut self, from: Team, to: Team) {
        self.nodes.insert(from);
        self.nodes.insert(to);
        self.successors.entry(from).or_default().push(to);
        *self.in_degree.entry(to).or_default() += 1;
    }

    /// Split the arcs into simple cycles.
    ///
    /// Cycles through `hub` come first, one per arc leaving it in insertion
    /// order, each listed from `hub`. Cycles avoiding `hub` follow, each listed
    /// from its smallest node. Nodes without arcs are ignored.
    pub fn simple_cycles(&self, hub: Team) -> Result<Vec<Vec<Team>>, CycleError> {
        self.check_degrees(hub)?;
        let mut visited = BTreeSet::new();
        let mut cycles = Vec::new();

        for &first in self.successors.get(&hub).map_or(&[][..], Vec::as_slice) {
            cycles.push(self.walk(hub, first, &mut visited)?);
        }

        for &start in &self.nodes {
            if start == hub || visited.contains(&start) || !self.successors.contains_key(&start) {
                continue;
            }
            visited.insert(start);
            let next = self.successor(start)?;
            cycles.push(self.walk(start, next, &mut visited)?);
        }
        Ok(cycles)
    }

    fn check_degrees(&self, hub: Team) -> Result<(), CycleError> {
        for (&node, next) in &self.successors {
            if node != hub && next.len() > 1 {
                return Err(CycleError::Branching { node });
            }
        }
        for (&node, &count) in &self.in_degree {
            if node != hub && count > 1 {
                return Err(CycleError::Branching { node });
            }
        }
        Ok(())
    }

    fn successor(&self, node: Team) -> Result<Team, CycleError> {
        self.successors
            .get(&node)
            .and_then(|next| next.first())
            .copied()
            .ok_or(CycleError::DeadEnd { node })
    }

    /// Follow successors from `start -> first` until the walk returns to `start`.
    fn walk(
        &self,
        start: Team,
        first: Team,
        visited: &mut BTreeSet<Team>,
    ) -> Result<Vec<Team>, CycleError> {
        let mut cycle = vec![start];
        let mut current = first;
        while current != start {
            if !visited.insert(current) {
                return Err(CycleError::Tangled { node: current });
            }
            cycle.push(current);
            current = self.successor(current)?;
        }
        Ok(cycle)
    }
}
