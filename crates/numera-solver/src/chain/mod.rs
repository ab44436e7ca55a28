//! Chains, colorings and the searches that produce them.
//!
//! Every search here works on implications between candidate states. A state is a
//! candidate with a [`Polarity`]: "on" asserts the candidate is true, "off" that it is
//! false. Following a weak link from an on state yields an off state; following a strong
//! link from an off state yields an on state. Each step is a valid implication, so a
//! path from one state to another proves that the first implies the second.

use std::fmt::{self, Display};

use numera_core::{CANDIDATE_COUNT, Candidate};

use crate::graph::{LinkGraph, LinkStrength};

pub use self::{
    cluster::{Cluster, strong_clusters},
    coloring::{Coloring, Contradiction},
};

mod cluster;
mod coloring;

/// Whether a candidate is assumed true or false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Polarity {
    /// The candidate is true.
    On,
    /// The candidate is false.
    Off,
}

impl Polarity {
    /// Returns the other polarity.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Polarity::On => Polarity::Off,
            Polarity::Off => Polarity::On,
        }
    }

    const fn bit(self) -> usize {
        match self {
            Polarity::On => 0,
            Polarity::Off => 1,
        }
    }
}

const STATE_COUNT: usize = CANDIDATE_COUNT * 2;

const fn state_index(candidate: Candidate, polarity: Polarity) -> usize {
    candidate.index() * 2 + polarity.bit()
}

const fn state_from_index(index: usize) -> (Candidate, Polarity) {
    let polarity = if index % 2 == 0 {
        Polarity::On
    } else {
        Polarity::Off
    };
    (Candidate::from_index(index / 2), polarity)
}

/// An alternating sequence of candidates and links.
///
/// The polarity of the first node is given; every later node is on if it was reached
/// through a strong link and off if it was reached through a weak one.
///
/// # Examples
///
/// ```
/// use numera_core::{Candidate, Digit, Position};
/// use numera_solver::{chain::{Chain, Polarity}, graph::LinkStrength};
///
/// let mut chain = Chain::new(Candidate::new(Position::new(1, 0), Digit::D3), Polarity::Off);
/// chain.push(LinkStrength::Strong, Candidate::new(Position::new(4, 0), Digit::D3));
/// chain.push(LinkStrength::Weak, Candidate::new(Position::new(4, 1), Digit::D3));
/// assert_eq!(chain.to_string(), "r1c2(3) = r1c5(3) - r2c5(3)");
/// assert_eq!(chain.end_polarity(), Polarity::Off);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    start: Polarity,
    nodes: Vec<Candidate>,
    links: Vec<LinkStrength>,
}

impl Chain {
    /// Creates a chain holding a single node.
    #[must_use]
    pub fn new(first: Candidate, start: Polarity) -> Self {
        Self {
            start,
            nodes: vec![first],
            links: Vec::new(),
        }
    }

    /// Appends a node through a link.
    pub fn push(&mut self, strength: LinkStrength, candidate: Candidate) {
        self.links.push(strength);
        self.nodes.push(candidate);
    }

    /// Returns the number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if the chain has no link.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Returns the nodes in order.
    #[must_use]
    pub fn nodes(&self) -> &[Candidate] {
        &self.nodes
    }

    /// Returns the first node.
    #[must_use]
    pub fn first(&self) -> Candidate {
        self.nodes[0]
    }

    /// Returns the last node.
    #[must_use]
    pub fn last(&self) -> Candidate {
        self.nodes[self.nodes.len() - 1]
    }

    /// Returns the polarity of the first node.
    #[must_use]
    pub fn start_polarity(&self) -> Polarity {
        self.start
    }

    /// Returns the polarity of the last node.
    #[must_use]
    pub fn end_polarity(&self) -> Polarity {
        match self.links.last() {
            None => self.start,
            Some(LinkStrength::Strong) => Polarity::On,
            Some(LinkStrength::Weak) => Polarity::Off,
        }
    }

    /// Returns every node with its polarity along the chain.
    pub fn nodes_with_polarity(&self) -> impl Iterator<Item = (Candidate, Polarity)> + '_ {
        let polarities = std::iter::once(self.start).chain(self.links.iter().map(|l| match l {
            LinkStrength::Strong => Polarity::On,
            LinkStrength::Weak => Polarity::Off,
        }));
        self.nodes.iter().copied().zip(polarities)
    }

    /// Returns every link as `(from, to, strength)`.
    pub fn links(&self) -> impl Iterator<Item = (Candidate, Candidate, LinkStrength)> + '_ {
        self.nodes
            .windows(2)
            .zip(&self.links)
            .map(|(pair, &strength)| (pair[0], pair[1], strength))
    }
}

impl Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.nodes[0])?;
        for (node, link) in self.nodes[1..].iter().zip(&self.links) {
            write!(f, " {link} {node}")?;
        }
        Ok(())
    }
}

const UNVISITED: u16 = u16::MAX;

/// The result of an alternating breadth-first search from one seed state.
///
/// Every reached state records the state it was reached from, so the shortest chain to
/// it can be rebuilt.
#[derive(Clone)]
pub struct ChainSearch {
    seed: Candidate,
    start: Polarity,
    depth: Box<[u16]>,
    predecessor: Box<[u16]>,
    order: Vec<u16>,
}

impl fmt::Debug for ChainSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainSearch")
            .field("seed", &self.seed)
            .field("start", &self.start)
            .field("reached", &self.order.len())
            .finish()
    }
}

/// Searches every state reachable from `(seed, start)` with at most `max_length` links.
///
/// From an on state the search follows weak links, from an off state strong links, so
/// every path it finds alternates the way an inference chain must. States are visited in
/// breadth-first order, which makes every recorded chain a shortest one.
#[must_use]
pub fn alternating_search(
    graph: &LinkGraph,
    seed: Candidate,
    start: Polarity,
    max_length: usize,
) -> ChainSearch {
    let mut depth = vec![UNVISITED; STATE_COUNT].into_boxed_slice();
    let mut predecessor = vec![UNVISITED; STATE_COUNT].into_boxed_slice();
    let mut order = Vec::new();
    let start_index = state_index(seed, start);
    depth[start_index] = 0;
    order.push(to_u16(start_index));

    let mut head = 0;
    while head < order.len() {
        let current = usize::from(order[head]);
        head += 1;
        let current_depth = depth[current];
        if usize::from(current_depth) >= max_length {
            continue;
        }
        let (candidate, polarity) = state_from_index(current);
        let (strength, next) = match polarity {
            Polarity::On => (LinkStrength::Weak, Polarity::Off),
            Polarity::Off => (LinkStrength::Strong, Polarity::On),
        };
        for neighbor in graph.neighbors(candidate, strength) {
            let index = state_index(neighbor, next);
            if depth[index] != UNVISITED {
                continue;
            }
            depth[index] = current_depth + 1;
            predecessor[index] = to_u16(current);
            order.push(to_u16(index));
        }
    }

    ChainSearch {
        seed,
        start,
        depth,
        predecessor,
        order,
    }
}

#[expect(clippy::cast_possible_truncation)]
const fn to_u16(index: usize) -> u16 {
    index as u16
}

impl ChainSearch {
    /// Returns the seed candidate.
    #[must_use]
    pub fn seed(&self) -> Candidate {
        self.seed
    }

    /// Returns the polarity the search started from.
    #[must_use]
    pub fn start(&self) -> Polarity {
        self.start
    }

    /// Returns `true` if the state was reached.
    #[must_use]
    pub fn reached(&self, candidate: Candidate, polarity: Polarity) -> bool {
        self.depth[state_index(candidate, polarity)] != UNVISITED
    }

    /// Returns the length of the shortest chain to the state.
    #[must_use]
    pub fn depth(&self, candidate: Candidate, polarity: Polarity) -> Option<usize> {
        let depth = self.depth[state_index(candidate, polarity)];
        (depth != UNVISITED).then_some(usize::from(depth))
    }

    /// Returns every reached state except the starting one, nearest first.
    pub fn reached_states(&self) -> impl Iterator<Item = (Candidate, Polarity)> + '_ {
        self.order[1..]
            .iter()
            .map(|&index| state_from_index(usize::from(index)))
    }

    /// Rebuilds the shortest chain from the seed to the state.
    #[must_use]
    pub fn chain_to(&self, candidate: Candidate, polarity: Polarity) -> Option<Chain> {
        let mut index = state_index(candidate, polarity);
        if self.depth[index] == UNVISITED {
            return None;
        }
        let mut states = vec![index];
        while self.predecessor[index] != UNVISITED {
            index = usize::from(self.predecessor[index]);
            states.push(index);
        }
        states.reverse();

        let (first, start) = state_from_index(states[0]);
        let mut chain = Chain::new(first, start);
        for &index in &states[1..] {
            let (node, polarity) = state_from_index(index);
            let strength = match polarity {
                Polarity::On => LinkStrength::Strong,
                Polarity::Off => LinkStrength::Weak,
            };
            chain.push(strength, node);
        }
        Some(chain)
    }
}

#[cfg(test)]
mod tests {
    use numera_core::{CandidateGrid, Digit, GridState, Position};

    use super::*;
    use crate::graph::LinkRules;

    const X_WING: &str = "03c848csc4cs1121g10hg105481121034881c8112103c0g1050h485848g1210h4481140350210hs403c4k81448050381k0091121k00hc80h4811s4cck80321g1c811c821030hc805210503cos0cok8s811";

    #[test]
    fn test_state_index_roundtrip() {
        for candidate in Candidate::all() {
            for polarity in [Polarity::On, Polarity::Off] {
                assert_eq!(
                    state_from_index(state_index(candidate, polarity)),
                    (candidate, polarity)
                );
            }
        }
    }

    #[test]
    fn test_chains_alternate_and_are_linked() {
        let state: GridState = X_WING.parse().unwrap();
        let grid = CandidateGrid::from_state(&state);
        let graph = LinkGraph::build(&grid, LinkRules::STANDARD);
        let seed = Candidate::new(Position::new(3, 1), Digit::D7);
        let search = alternating_search(&graph, seed, Polarity::Off, 8);

        // the conjugate in row 2 is true whenever the seed is false
        let partner = Candidate::new(Position::new(7, 1), Digit::D7);
        assert_eq!(search.depth(partner, Polarity::On), Some(1));

        for (candidate, polarity) in search.reached_states() {
            let chain = search.chain_to(candidate, polarity).unwrap();
            assert_eq!(chain.first(), seed);
            assert_eq!(chain.last(), candidate);
            assert_eq!(chain.end_polarity(), polarity);
            assert_eq!(Some(chain.len()), search.depth(candidate, polarity));
            assert!(chain.len() <= 8);
            for (from, to, strength) in chain.links() {
                assert!(graph.are_linked(from, to, strength));
            }
        }
    }

    #[test]
    fn test_max_length_bounds_search() {
        let state: GridState = X_WING.parse().unwrap();
        let grid = CandidateGrid::from_state(&state);
        let graph = LinkGraph::build(&grid, LinkRules::STANDARD);
        let seed = Candidate::new(Position::new(3, 1), Digit::D7);
        let search = alternating_search(&graph, seed, Polarity::On, 1);
        assert!(search.reached_states().all(|(_, polarity)| polarity.is_off()));
        assert!(!search.reached(seed, Polarity::Off));
    }
}
