use std::ops::ControlFlow;

use numera_core::{Candidate, CandidateGrid, DigitPositions, Position};

use super::StrategyContext;
use crate::{
    chain::{Polarity, alternating_search},
    graph::LinkRules,
    report::ChainExplanation,
};

/// Chains of bivalue cells that start and end on the same digit.
///
/// One of the two ends holds the digit, so it goes from every cell that sees both.
pub(super) fn xy_chain(ctx: &mut StrategyContext<'_>, max_length: usize) -> ControlFlow<()> {
    let grid = ctx.grid();
    let graph = ctx.graph(LinkRules::CELL_STRONG | LinkRules::UNIT_WEAK);
    for pos in grid.bivalue_cells() {
        for digit in grid.candidates_at(pos) {
            let seed = Candidate::new(pos, digit);
            let search = alternating_search(&graph, seed, Polarity::Off, max_length);
            for (end, polarity) in search.reached_states() {
                if polarity.is_off() || end.digit != digit || end.position <= pos {
                    continue;
                }
                let targets = grid.open_peers(pos, digit) & grid.open_peers(end.position, digit);
                ctx.propose_eliminations(targets, digit);
                if !ctx.need_commit() {
                    continue;
                }
                let Some(chain) = search.chain_to(end, Polarity::On) else {
                    ctx.discard();
                    continue;
                };
                ctx.commit(|| ChainExplanation::new("XY-Chain", chain))?;
            }
        }
    }
    ControlFlow::Continue(())
}

/// Chains alternating strong and weak links between any candidates.
///
/// With the seed false, everything the chain reaches as true holds:
///
/// - reaching the seed itself as true places it,
/// - reaching another candidate as true removes whatever excludes both ends.
///
/// With the seed true, reaching it as false removes it.
pub(super) fn alternating_inference_chain(
    ctx: &mut StrategyContext<'_>,
    max_length: usize,
) -> ControlFlow<()> {
    let grid = ctx.grid();
    let graph = ctx.graph(LinkRules::STANDARD);
    for seed in graph.nodes() {
        let from_off = alternating_search(&graph, seed, Polarity::Off, max_length);
        if let Some(chain) = from_off.chain_to(seed, Polarity::On) {
            ctx.propose_assignment(seed.position, seed.digit);
            ctx.commit(|| ChainExplanation::new("Continuous loop", chain))?;
        }

        let from_on = alternating_search(&graph, seed, Polarity::On, max_length);
        if let Some(chain) = from_on.chain_to(seed, Polarity::Off) {
            ctx.propose_elimination(seed.position, seed.digit);
            ctx.commit(|| ChainExplanation::new("Discontinuous loop", chain))?;
        }

        for (end, polarity) in from_off.reached_states() {
            if polarity.is_off() || end <= seed {
                continue;
            }
            for victim in common_exclusions(grid, seed, end) {
                ctx.propose_elimination(victim.position, victim.digit);
            }
            if !ctx.need_commit() {
                continue;
            }
            let Some(chain) = from_off.chain_to(end, Polarity::On) else {
                ctx.discard();
                continue;
            };
            ctx.commit(|| ChainExplanation::new("Alternating Inference Chain", chain))?;
        }
    }
    ControlFlow::Continue(())
}

/// Returns the open candidates that exclude both `a` and `b`.
fn common_exclusions(
    grid: &CandidateGrid,
    a: Candidate,
    b: Candidate,
) -> impl Iterator<Item = Candidate> + '_ {
    let around = |pos: Position| pos.peers() | DigitPositions::from_elem(pos);
    let cells = around(a.position) & around(b.position) & grid.unsolved_cells();
    cells.into_iter().flat_map(move |pos| {
        grid.candidates_at(pos)
            .into_iter()
            .map(move |digit| Candidate::new(pos, digit))
            .filter(move |&c| c != a && c != b && c.excludes(a) && c.excludes(b))
    })
}
