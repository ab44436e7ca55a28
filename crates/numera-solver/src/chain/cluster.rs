use numera_core::{Candidate, CandidateSet};

use crate::graph::{LinkGraph, LinkStrength};

/// A connected group of strongly linked candidates, split into two colors.
///
/// Neighbours through a strong link get opposite colors. Since the strong links the
/// graph records are between mutually exclusive candidates, exactly one color is true
/// in every solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    members: [Vec<Candidate>; 2],
    sets: [CandidateSet; 2],
}

impl Cluster {
    /// Returns the candidates of one color (0 or 1), in discovery order.
    #[must_use]
    pub fn members(&self, color: usize) -> &[Candidate] {
        &self.members[color]
    }

    /// Returns the candidates of one color as a set.
    #[must_use]
    pub fn set(&self, color: usize) -> &CandidateSet {
        &self.sets[color]
    }

    /// Returns the color of `candidate`, if it belongs to the cluster.
    #[must_use]
    pub fn color_of(&self, candidate: Candidate) -> Option<usize> {
        (0..2).find(|&color| self.sets[color].contains(candidate))
    }

    /// Returns the number of candidates in the cluster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members[0].len() + self.members[1].len()
    }

    /// Returns `true` if the cluster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every member with its color.
    pub fn iter(&self) -> impl Iterator<Item = (Candidate, usize)> + '_ {
        self.members[0]
            .iter()
            .map(|&c| (c, 0))
            .chain(self.members[1].iter().map(|&c| (c, 1)))
    }
}

/// Colors the strong-link components of `graph` restricted to `nodes`.
///
/// Candidates without a strong link are skipped. Components are returned in order of
/// their smallest candidate.
#[must_use]
pub fn strong_clusters(graph: &LinkGraph, nodes: &CandidateSet) -> Vec<Cluster> {
    let mut seen = CandidateSet::EMPTY;
    let mut clusters = Vec::new();
    for start in nodes {
        if seen.contains(start) || graph.neighbors(start, LinkStrength::Strong).is_empty() {
            continue;
        }
        let mut cluster = Cluster {
            members: [Vec::new(), Vec::new()],
            sets: [CandidateSet::EMPTY; 2],
        };
        let mut queue = vec![(start, 0)];
        seen.insert(start);
        let mut head = 0;
        while let Some(&(candidate, color)) = queue.get(head) {
            head += 1;
            cluster.members[color].push(candidate);
            cluster.sets[color].insert(candidate);
            for next in graph.neighbors(candidate, LinkStrength::Strong) {
                if nodes.contains(next) && seen.insert(next) {
                    queue.push((next, 1 - color));
                }
            }
        }
        clusters.push(cluster);
    }
    clusters
}

#[cfg(test)]
mod tests {
    use numera_core::{CandidateGrid, Digit, GridState};

    use super::*;
    use crate::graph::LinkRules;

    const SIMPLE_COLORING: &str = "05k088880h03k011210hk81121c005s00348c0032148g111c40c0h0911c00305g1210hc0030h05c0214811g188c021g111880h440c0311810h0503210941g1g105480h4881032111214803g111480h8105";

    #[test]
    fn test_linked_candidates_have_opposite_colors() {
        let state: GridState = SIMPLE_COLORING.parse().unwrap();
        let grid = CandidateGrid::from_state(&state);
        let graph = LinkGraph::build(&grid, LinkRules::UNIT_STRONG);
        let sevens: CandidateSet = graph
            .nodes()
            .iter()
            .filter(|c| c.digit == Digit::D7)
            .collect();
        let clusters = strong_clusters(&graph, &sevens);
        assert!(!clusters.is_empty());
        for cluster in &clusters {
            assert!(cluster.set(0).is_disjoint(cluster.set(1)));
            for (candidate, color) in cluster.iter() {
                assert_eq!(candidate.digit, Digit::D7);
                for next in graph.neighbors(candidate, LinkStrength::Strong) {
                    assert_eq!(cluster.color_of(next), Some(1 - color));
                }
            }
        }
    }
}
