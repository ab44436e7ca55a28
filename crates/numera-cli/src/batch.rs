use std::{
    fmt::{self, Display},
    fs,
    io::{self, Read as _},
    path::Path,
};

use numera_core::DigitGrid;
use numera_solver::{Difficulty, SolveStatus, StatisticsTracker, StrategySolver};
use rayon::prelude::*;

use crate::CliError;

/// Reads a puzzle file, or standard input for `-`.
pub(crate) fn read_input(path: &Path) -> Result<String, CliError> {
    let result = if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        fs::read_to_string(path)
    };
    result.map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })
}

/// The result of one puzzle of a batch.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BatchLine {
    pub(crate) line: usize,
    pub(crate) puzzle: String,
    pub(crate) result: LineResult,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LineResult {
    Solved { hardest: Option<Difficulty> },
    Stuck { hardest: Option<Difficulty>, remaining: usize },
    Contradiction,
    Unreadable(String),
}

impl Display for BatchLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5} {} ", self.line, self.puzzle)?;
        let rated = |hardest: &Option<Difficulty>| {
            hardest.map_or_else(|| "none".to_owned(), |d| d.to_string())
        };
        match &self.result {
            LineResult::Solved { hardest } => write!(f, "solved ({})", rated(hardest)),
            LineResult::Stuck { hardest, remaining } => {
                write!(f, "stuck ({}, {remaining} cells left)", rated(hardest))
            }
            LineResult::Contradiction => f.write_str("contradiction"),
            LineResult::Unreadable(err) => write!(f, "unreadable: {err}"),
        }
    }
}

/// Per-line results in input order with the merged statistics of every worker.
#[derive(Debug, Default)]
pub(crate) struct BatchSummary {
    pub(crate) lines: Vec<BatchLine>,
    pub(crate) tracker: StatisticsTracker,
    pub(crate) unreadable: usize,
}

impl BatchSummary {
    fn merge(mut self, other: Self) -> Self {
        self.lines.extend(other.lines);
        self.tracker.merge(&other.tracker);
        self.unreadable += other.unreadable;
        self
    }
}

/// Solves every non-empty line of `text` that is not a `#` comment.
///
/// Every rayon worker clones `solver` and owns its copy, with its own tracker.
pub(crate) fn solve_all(solver: &StrategySolver, text: &str) -> BatchSummary {
    let puzzles: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .collect();
    log::info!("solving {} puzzles", puzzles.len());

    let (_, mut summary) = puzzles
        .into_par_iter()
        .fold(
            || {
                let mut solver = solver.clone();
                solver.attach_tracker(StatisticsTracker::new());
                (solver, BatchSummary::default())
            },
            |(mut solver, mut summary), (line, puzzle)| {
                let result = solve_line(&mut solver, puzzle);
                if matches!(result, LineResult::Unreadable(_)) {
                    summary.unreadable += 1;
                }
                summary.lines.push(BatchLine {
                    line,
                    puzzle: puzzle.to_owned(),
                    result,
                });
                (solver, summary)
            },
        )
        .map(|(mut solver, mut summary)| {
            if let Some(tracker) = solver.detach_tracker() {
                summary.tracker = tracker;
            }
            (solver, summary)
        })
        .reduce_with(|(solver, a), (_, b)| (solver, a.merge(b)))
        .unwrap_or_else(|| (solver.clone(), BatchSummary::default()));

    summary.lines.sort_by_key(|line| line.line);
    summary
}

fn solve_line(solver: &mut StrategySolver, puzzle: &str) -> LineResult {
    let grid: DigitGrid = match puzzle.parse() {
        Ok(grid) => grid,
        Err(err) => return LineResult::Unreadable(err.to_string()),
    };
    solver.set_grid(&grid);
    let outcome = solver.solve();
    match outcome.status {
        SolveStatus::Solved => LineResult::Solved {
            hardest: outcome.hardest,
        },
        SolveStatus::Stuck | SolveStatus::Stopped => LineResult::Stuck {
            hardest: outcome.hardest,
            remaining: 81 - solver.grid().solved_count(),
        },
        SolveStatus::Contradiction(_) => LineResult::Contradiction,
    }
}
