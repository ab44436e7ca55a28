use std::ops::ControlFlow;

use numera_core::{Candidate, CandidateGrid, CandidateSet, Digit};

use super::StrategyContext;
use crate::{
    chain::{Cluster, strong_clusters},
    graph::{LinkGraph, LinkRules, LinkStrength},
    report::{Explanation, HighlightRole},
};

/// Two-colors the conjugate pairs of each digit.
///
/// If two candidates of one color see each other, that color is false and the other one
/// is placed. Otherwise candidates that see both colors are removed.
pub(super) fn simple_coloring(ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
    let grid = ctx.grid();
    let graph = ctx.graph(LinkRules::UNIT_STRONG);
    for digit in Digit::ALL {
        let nodes: CandidateSet = graph.nodes().iter().filter(|c| c.digit == digit).collect();
        for cluster in strong_clusters(&graph, &nodes) {
            let excluded = cluster_exclusions(grid, &cluster, false);
            resolve(ctx, "Simple Coloring", &cluster, &excluded, false, &graph)?;
        }
    }
    ControlFlow::Continue(())
}

/// Two-colors candidates across digits, through conjugate pairs and bivalue cells.
///
/// On top of the simple coloring rules, a color is false if it would empty a cell, and a
/// candidate is removed if it shares a cell with one color and sees the other.
pub(super) fn medusa(ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
    let grid = ctx.grid();
    let graph = ctx.graph(LinkRules::CELL_STRONG | LinkRules::UNIT_STRONG);
    for cluster in strong_clusters(&graph, graph.nodes()) {
        let excluded = cluster_exclusions(grid, &cluster, true);
        resolve(ctx, "3D Medusa", &cluster, &excluded, true, &graph)?;
    }
    ControlFlow::Continue(())
}

/// Returns, per color, the candidates that color turns off.
fn cluster_exclusions(
    grid: &CandidateGrid,
    cluster: &Cluster,
    cell_mates: bool,
) -> [CandidateSet; 2] {
    [0, 1].map(|color| {
        let mut excluded = CandidateSet::EMPTY;
        for &member in cluster.members(color) {
            for peer in grid.open_peers(member.position, member.digit) {
                excluded.insert(Candidate::new(peer, member.digit));
            }
            if cell_mates {
                for digit in grid.candidates_at(member.position) {
                    if digit != member.digit {
                        excluded.insert(Candidate::new(member.position, digit));
                    }
                }
            }
        }
        excluded
    })
}

fn false_color(
    grid: &CandidateGrid,
    cluster: &Cluster,
    excluded: &[CandidateSet; 2],
    check_cells: bool,
) -> Option<usize> {
    (0..2).find(|&color| {
        let clash = !cluster.set(color).is_disjoint(&excluded[color]);
        clash
            || (check_cells
                && grid.unsolved_cells().iter().any(|pos| {
                    grid.candidates_at(pos)
                        .iter()
                        .all(|digit| excluded[color].contains(Candidate::new(pos, digit)))
                }))
    })
}

fn resolve(
    ctx: &mut StrategyContext<'_>,
    kind: &str,
    cluster: &Cluster,
    excluded: &[CandidateSet; 2],
    check_cells: bool,
    graph: &LinkGraph,
) -> ControlFlow<()> {
    let grid = ctx.grid();
    let title = if let Some(color) = false_color(grid, cluster, excluded, check_cells) {
        for &member in cluster.members(1 - color) {
            ctx.propose_assignment(member.position, member.digit);
        }
        format!("{kind}: one color contradicts itself, placing the other")
    } else {
        let trapped = excluded[0].intersection(&excluded[1]);
        for candidate in &trapped {
            if cluster.color_of(candidate).is_none() {
                ctx.propose_elimination(candidate.position, candidate.digit);
            }
        }
        format!("{kind}: candidates see both colors")
    };
    ctx.commit(|| {
        let mut explanation = Explanation::new(title)
            .candidates(cluster.members(0).iter().copied(), HighlightRole::On)
            .candidates(cluster.members(1).iter().copied(), HighlightRole::Off);
        for (member, _) in cluster.iter() {
            for next in graph.neighbors(member, LinkStrength::Strong) {
                if member < next && cluster.color_of(next).is_some() {
                    explanation = explanation.link(member, next, LinkStrength::Strong);
                }
            }
        }
        explanation
    })
}

#[cfg(test)]
mod tests {
    use numera_core::{Digit, Position};

    use crate::{StrategyRegistry, testing::StrategyTester};

    const COLOR_WRAP: &str = "05k088880h03k011210hk81121c005s00348c0032148g111c40c0h0911c00305g1210hc0030h05c0214811g188c021g111880h440c0311810h0503210941g1g105480h4881032111214803g111480h8105";
    const COLOR_TRAP: &str = "05l8d8c80h03s018210hl8d821d005s00348c00321c8g158c41c0h0950d00305g1210hc0030h05c8214811g1c8c021g111c80h440c0311810h0503210941g1g105480h4881032111214803g158580h8105";

    #[test]
    fn test_simple_coloring_wrap() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_state_str(COLOR_WRAP)
            .apply_once(registry.get("Simple Coloring").unwrap())
            .assert_placed(Position::new(4, 1), Digit::D7)
            .assert_placed(Position::new(8, 3), Digit::D7)
            .assert_placed(Position::new(3, 4), Digit::D7)
            .assert_placed(Position::new(0, 5), Digit::D7)
            .assert_placed(Position::new(2, 7), Digit::D7)
            .assert_placed(Position::new(5, 8), Digit::D7)
            .assert_sound();
    }

    #[test]
    fn test_simple_coloring_trap() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_state_str(COLOR_TRAP)
            .apply_once(registry.get("Simple Coloring").unwrap())
            .assert_removed_includes(Position::new(2, 1), [Digit::D8])
            .assert_removed_includes(Position::new(3, 2), [Digit::D8])
            .assert_sound();
    }

    #[test]
    fn test_medusa_is_sound() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_state_str(COLOR_TRAP)
            .apply_until_stuck(registry.get("3D Medusa").unwrap())
            .assert_sound();
    }
}
