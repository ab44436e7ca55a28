use std::{ops::ControlFlow, sync::Arc};

use numera_core::{Candidate, House};

use super::StrategyContext;
use crate::{
    chain::{Coloring, Contradiction, Polarity},
    graph::LinkStrength,
    report::{Explanation, HighlightRole},
};

/// Assumes each candidate true and removes the ones that lead to a contradiction.
pub(super) fn nishio(ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
    let grid = ctx.grid();
    for candidate in Candidate::all().filter(|&c| grid.contains(c)) {
        let on = ctx.coloring(candidate, Polarity::On);
        let Some(contradiction) = on.contradiction() else {
            continue;
        };
        ctx.propose_elimination(candidate.position, candidate.digit);
        ctx.commit(|| {
            Explanation::new(format!("Nishio: {candidate} leads to {contradiction}"))
                .candidate(candidate, HighlightRole::Cause)
        })?;
    }
    ControlFlow::Continue(())
}

/// Assumes each candidate both true and false.
///
/// A contradictory side settles the candidate. Otherwise whatever both sides agree on
/// holds.
pub(super) fn digit_forcing_net(ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
    let grid = ctx.grid();
    for candidate in Candidate::all().filter(|&c| grid.contains(c)) {
        let on = ctx.coloring(candidate, Polarity::On);
        let off = ctx.coloring(candidate, Polarity::Off);
        let title = match (on.contradiction(), off.contradiction()) {
            (Some(_), Some(_)) => continue,
            (Some(contradiction), None) => {
                ctx.propose_elimination(candidate.position, candidate.digit);
                format!("Digit forcing net: {candidate} leads to {contradiction}")
            }
            (None, Some(contradiction)) => {
                ctx.propose_assignment(candidate.position, candidate.digit);
                format!("Digit forcing net: without {candidate}, {contradiction}")
            }
            (None, None) => {
                propose_consensus(ctx, [&on, &off]);
                format!("Digit forcing net: {candidate} either way")
            }
        };
        ctx.commit(|| explain_net(title, &[Arc::clone(&on), Arc::clone(&off)]))?;
    }
    ControlFlow::Continue(())
}

/// Assumes each candidate of a cell true in turn.
///
/// One of them is the solution, so what every consistent branch agrees on holds, and
/// each contradictory branch removes its candidate.
pub(super) fn cell_forcing_net(
    ctx: &mut StrategyContext<'_>,
    max_possibilities: usize,
) -> ControlFlow<()> {
    let grid = ctx.grid();
    for pos in grid.unsolved_cells() {
        let digits = grid.candidates_at(pos);
        if !(2..=max_possibilities).contains(&digits.len()) {
            continue;
        }
        let seeds: Vec<Candidate> = digits.iter().map(|d| Candidate::new(pos, d)).collect();
        branch_net(ctx, &format!("Cell forcing net on {pos}"), &seeds)?;
    }
    ControlFlow::Continue(())
}

/// Assumes each position of a digit in a house true in turn, with the same rules as
/// [`cell_forcing_net`].
pub(super) fn unit_forcing_net(
    ctx: &mut StrategyContext<'_>,
    max_possibilities: usize,
) -> ControlFlow<()> {
    let grid = ctx.grid();
    for house in House::ALL {
        let solved = grid.digits_solved_in(house);
        for digit in solved.complement() {
            let positions = grid.house_positions(house, digit);
            if !(2..=max_possibilities).contains(&positions.len()) {
                continue;
            }
            let seeds: Vec<Candidate> =
                positions.iter().map(|p| Candidate::new(p, digit)).collect();
            branch_net(ctx, &format!("Unit forcing net on {digit} in {house}"), &seeds)?;
        }
    }
    ControlFlow::Continue(())
}

fn branch_net(ctx: &mut StrategyContext<'_>, title: &str, seeds: &[Candidate]) -> ControlFlow<()> {
    let branches: Vec<Arc<Coloring>> = seeds
        .iter()
        .map(|&seed| ctx.coloring(seed, Polarity::On))
        .collect();
    let (failed, consistent): (Vec<_>, Vec<_>) =
        branches.iter().partition(|branch| branch.is_contradictory());
    if consistent.is_empty() {
        return ControlFlow::Continue(());
    }
    for branch in failed {
        let seed = branch.seed();
        ctx.propose_elimination(seed.position, seed.digit);
    }
    propose_consensus(ctx, consistent);
    ctx.commit(|| explain_net(title.to_owned(), &branches))
}

fn propose_consensus<'c, I>(ctx: &mut StrategyContext<'_>, branches: I)
where
    I: IntoIterator<Item = &'c Arc<Coloring>>,
{
    let mut branches = branches.into_iter();
    let Some(first) = branches.next() else {
        return;
    };
    let (on, off) = branches.fold((*first.on(), *first.off()), |(on, off), branch| {
        (on.intersection(branch.on()), off.intersection(branch.off()))
    });
    for candidate in &on {
        ctx.propose_assignment(candidate.position, candidate.digit);
    }
    for candidate in &off {
        ctx.propose_elimination(candidate.position, candidate.digit);
    }
}

fn explain_net(title: String, branches: &[Arc<Coloring>]) -> Explanation {
    let mut explanation = Explanation::new(title);
    for branch in branches {
        let role = if branch.is_contradictory() {
            HighlightRole::Cause
        } else {
            match branch.polarity() {
                Polarity::On => HighlightRole::On,
                Polarity::Off => HighlightRole::Off,
            }
        };
        explanation = explanation.candidate(branch.seed(), role);
        for pair in contradiction_path(branch).unwrap_or_default().windows(2) {
            let ((from, from_polarity), (to, _)) = (pair[0], pair[1]);
            let strength = match from_polarity {
                Polarity::On => LinkStrength::Weak,
                Polarity::Off => LinkStrength::Strong,
            };
            explanation = explanation.link(from, to, strength);
        }
    }
    explanation
}

fn contradiction_path(branch: &Coloring) -> Option<Vec<(Candidate, Polarity)>> {
    match branch.contradiction()? {
        Contradiction::Both(candidate) => branch
            .path_to(candidate, Polarity::On)
            .or_else(|| branch.path_to(candidate, Polarity::Off)),
        Contradiction::EmptyCell(_) | Contradiction::EmptyHouse { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use numera_core::{Digit, Position};

    use crate::{StrategyRegistry, testing::StrategyTester};

    // r1c1 is 4; assuming 5 there leaves no place for 7 in row 7
    const PUZZLE: &str =
        "..3.2.6..9..3.5..1..18.64....81.29..7.......8..67.82....26.95..8..2.3..9..5.1.3..";

    #[test]
    fn test_nishio() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_str(PUZZLE)
            .apply_until_stuck(registry.get("Nishio Forcing Net").unwrap())
            .assert_removed_includes(Position::new(0, 0), [Digit::D5])
            .assert_sound();
    }

    #[test]
    fn test_digit_forcing_net() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_str(PUZZLE)
            .apply_until_stuck(registry.get("Digit Forcing Net").unwrap())
            .assert_removed_includes(Position::new(0, 0), [Digit::D5])
            .assert_sound();
    }

    #[test]
    fn test_branching_nets_are_sound() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_str(PUZZLE)
            .apply_times(registry.get("Cell Forcing Net").unwrap(), 5)
            .assert_sound()
            .apply_times(registry.get("Unit Forcing Net").unwrap(), 5)
            .assert_sound();
    }

    #[test]
    fn test_open_grid_has_no_net() {
        let registry = StrategyRegistry::standard();
        StrategyTester::from_str(&".".repeat(81))
            .apply_once(registry.get("Cell Forcing Net").unwrap())
            .assert_no_progress();
    }
}
