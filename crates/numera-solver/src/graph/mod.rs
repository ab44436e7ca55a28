//! Strong and weak links between candidates.
//!
//! A strong link between `a` and `b` means at least one of them is true; a weak link
//! means at most one is. Links are derived from the current grid by the rules selected
//! in [`LinkRules`], and a [`LinkGraph`] is only valid for the grid it was built from.
//! [`GraphCache`] keeps built graphs until the grid changes.

use std::fmt::{self, Display};

use numera_core::{
    CANDIDATE_COUNT, Candidate, CandidateGrid, CandidateSet, Digit, DigitSet, House, Position,
};

pub use self::cache::GraphCache;

mod cache;

/// The two kinds of link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum LinkStrength {
    /// At least one endpoint is true.
    Strong,
    /// At most one endpoint is true.
    Weak,
}

impl Display for LinkStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStrength::Strong => f.write_str("="),
            LinkStrength::Weak => f.write_str("-"),
        }
    }
}

bitflags::bitflags! {
    /// Construction rules for a [`LinkGraph`]. Rules compose by union.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LinkRules: u8 {
        /// The last two candidates of a cell are strongly linked.
        const CELL_STRONG = 1 << 0;
        /// Any two candidates of a cell are weakly linked.
        const CELL_WEAK = 1 << 1;
        /// The last two positions of a digit in a house are strongly linked.
        const UNIT_STRONG = 1 << 2;
        /// Any two positions of a digit in a house are weakly linked.
        const UNIT_WEAK = 1 << 3;
        /// Two outside candidates that would together remove both remaining options of
        /// a bivalue cell, or of a digit with two places left in a house, are weakly
        /// linked.
        const EXHAUSTION_WEAK = 1 << 4;
        /// Every strong link and every direct weak link.
        const STANDARD = Self::CELL_STRONG.bits()
            | Self::CELL_WEAK.bits()
            | Self::UNIT_STRONG.bits()
            | Self::UNIT_WEAK.bits();
    }
}

/// Links between the open candidates of one grid.
///
/// Every strong link between two mutually exclusive candidates (which is every strong
/// link the rules produce) is also recorded as a weak link.
///
/// # Examples
///
/// ```
/// use numera_core::{Candidate, CandidateGrid, Digit, Position};
/// use numera_solver::graph::{LinkGraph, LinkRules, LinkStrength};
///
/// let mut grid = CandidateGrid::new();
/// for digit in Digit::ALL.into_iter().skip(2) {
///     grid.eliminate(Position::new(0, 0), digit);
/// }
/// let graph = LinkGraph::build(&grid, LinkRules::CELL_STRONG);
/// let one = Candidate::new(Position::new(0, 0), Digit::D1);
/// let two = Candidate::new(Position::new(0, 0), Digit::D2);
/// assert!(graph.are_linked(one, two, LinkStrength::Strong));
/// assert!(graph.are_linked(one, two, LinkStrength::Weak));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LinkGraph {
    rules: LinkRules,
    nodes: CandidateSet,
    strong: Box<[CandidateSet]>,
    weak: Box<[CandidateSet]>,
}

impl fmt::Debug for LinkGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkGraph")
            .field("rules", &self.rules)
            .field("nodes", &self.nodes.len())
            .field("strong", &self.link_count(LinkStrength::Strong))
            .field("weak", &self.link_count(LinkStrength::Weak))
            .finish()
    }
}

impl LinkGraph {
    /// Builds the graph of `grid` under `rules`.
    #[must_use]
    pub fn build(grid: &CandidateGrid, rules: LinkRules) -> Self {
        let mut graph = Self {
            rules,
            nodes: CandidateSet::EMPTY,
            strong: vec![CandidateSet::EMPTY; CANDIDATE_COUNT].into_boxed_slice(),
            weak: vec![CandidateSet::EMPTY; CANDIDATE_COUNT].into_boxed_slice(),
        };
        for pos in grid.unsolved_cells() {
            for digit in grid.candidates_at(pos) {
                graph.nodes.insert(Candidate::new(pos, digit));
            }
        }
        if rules.contains(LinkRules::CELL_STRONG) {
            graph.add_cell_strong(grid);
        }
        if rules.contains(LinkRules::CELL_WEAK) {
            graph.add_cell_weak(grid);
        }
        if rules.contains(LinkRules::UNIT_STRONG) {
            graph.add_unit_strong(grid);
        }
        if rules.contains(LinkRules::UNIT_WEAK) {
            graph.add_unit_weak(grid);
        }
        if rules.contains(LinkRules::EXHAUSTION_WEAK) {
            graph.add_exhaustion_weak(grid);
        }
        log::trace!("built {graph:?}");
        graph
    }

    /// Returns the rules the graph was built with.
    #[must_use]
    pub fn rules(&self) -> LinkRules {
        self.rules
    }

    /// Returns every open candidate of the underlying grid.
    #[must_use]
    pub fn nodes(&self) -> &CandidateSet {
        &self.nodes
    }

    /// Returns the candidates linked to `candidate` with the given strength.
    #[must_use]
    pub fn neighbors(&self, candidate: Candidate, strength: LinkStrength) -> &CandidateSet {
        match strength {
            LinkStrength::Strong => &self.strong[candidate.index()],
            LinkStrength::Weak => &self.weak[candidate.index()],
        }
    }

    /// Returns `true` if `a` and `b` are linked with the given strength.
    #[must_use]
    pub fn are_linked(&self, a: Candidate, b: Candidate, strength: LinkStrength) -> bool {
        self.neighbors(a, strength).contains(b)
    }

    /// Returns the number of links of the given strength.
    #[must_use]
    pub fn link_count(&self, strength: LinkStrength) -> usize {
        let table = match strength {
            LinkStrength::Strong => &self.strong,
            LinkStrength::Weak => &self.weak,
        };
        table.iter().map(CandidateSet::len).sum::<usize>() / 2
    }

    fn link(&mut self, a: Candidate, b: Candidate, strength: LinkStrength) {
        if a == b {
            return;
        }
        if strength.is_strong() {
            self.strong[a.index()].insert(b);
            self.strong[b.index()].insert(a);
            if !a.excludes(b) {
                return;
            }
        }
        self.weak[a.index()].insert(b);
        self.weak[b.index()].insert(a);
    }

    fn add_cell_strong(&mut self, grid: &CandidateGrid) {
        for pos in grid.bivalue_cells() {
            if let Some((a, b)) = grid.candidates_at(pos).as_double() {
                self.link(
                    Candidate::new(pos, a),
                    Candidate::new(pos, b),
                    LinkStrength::Strong,
                );
            }
        }
    }

    fn add_cell_weak(&mut self, grid: &CandidateGrid) {
        for pos in grid.unsolved_cells() {
            let digits = grid.candidates_at(pos);
            for a in digits {
                for b in digits.iter().filter(|&b| b > a) {
                    self.link(
                        Candidate::new(pos, a),
                        Candidate::new(pos, b),
                        LinkStrength::Weak,
                    );
                }
            }
        }
    }

    fn add_unit_strong(&mut self, grid: &CandidateGrid) {
        for house in House::ALL {
            for digit in Digit::ALL {
                if let Some((a, b)) = grid.house_positions(house, digit).as_double() {
                    self.link(
                        Candidate::new(a, digit),
                        Candidate::new(b, digit),
                        LinkStrength::Strong,
                    );
                }
            }
        }
    }

    fn add_unit_weak(&mut self, grid: &CandidateGrid) {
        for house in House::ALL {
            for digit in Digit::ALL {
                let positions = grid.house_positions(house, digit);
                for a in positions {
                    for b in positions.iter().filter(|&b| b > a) {
                        self.link(
                            Candidate::new(a, digit),
                            Candidate::new(b, digit),
                            LinkStrength::Weak,
                        );
                    }
                }
            }
        }
    }

    fn add_exhaustion_weak(&mut self, grid: &CandidateGrid) {
        for pos in grid.bivalue_cells() {
            let Some((a, b)) = grid.candidates_at(pos).as_double() else {
                continue;
            };
            for x in grid.open_peers(pos, a) {
                for y in grid.open_peers(pos, b) {
                    self.link(Candidate::new(x, a), Candidate::new(y, b), LinkStrength::Weak);
                }
            }
        }
        for house in House::ALL {
            for digit in Digit::ALL {
                let Some((p, q)) = grid.house_positions(house, digit).as_double() else {
                    continue;
                };
                let killers_p = killers(grid, p, digit, q);
                let killers_q = killers(grid, q, digit, p);
                for &x in &killers_p {
                    for &y in &killers_q {
                        self.link(x, y, LinkStrength::Weak);
                    }
                }
            }
        }
    }
}

/// Open candidates that rule out `digit` at `pos`, other than `digit` at `partner`.
fn killers(
    grid: &CandidateGrid,
    pos: Position,
    digit: Digit,
    partner: Position,
) -> Vec<Candidate> {
    let mut out: Vec<_> = (grid.candidates_at(pos) - DigitSet::from_elem(digit))
        .iter()
        .map(|other| Candidate::new(pos, other))
        .collect();
    out.extend(
        grid.open_peers(pos, digit)
            .iter()
            .filter(|&peer| peer != partner)
            .map(|peer| Candidate::new(peer, digit)),
    );
    out
}
