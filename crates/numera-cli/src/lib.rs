//! Command-line front end of the numera solver.
//!
//! The binary parses a [`Cli`] and hands it to [`run`]. Everything that touches files,
//! standard input or standard output lives here; the library crates never do I/O.

use std::{fs, io::Write as _};

use numera_core::{DigitGrid, GridState};
use numera_generator::{PuzzleGenerator, PuzzleSeed};
use numera_solver::{
    Backtracker, Difficulty, SolveOutcome, SolveStatus, StatisticsTracker, StrategyPreset,
    StrategyRegistry, StrategySolver,
};

pub use self::{
    args::{Cli, Command, GridInput, Level, PipelineArgs},
    error::CliError,
};

mod args;
mod batch;
mod error;

/// Runs one command.
///
/// # Errors
///
/// Returns an error if an input cannot be read or parsed, or if the presets are rejected.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Solve {
            input,
            steps,
            stats,
        } => {
            let mut solver = build_solver(&cli.pipeline)?;
            load_input(&mut solver, input)?;
            if *stats {
                solver.attach_tracker(StatisticsTracker::new());
            }
            let outcome = solver.solve();
            if *steps {
                for (i, report) in solver.steps().iter().enumerate() {
                    println!("{:>3}. {report}", i + 1);
                }
            }
            print_outcome(&solver, &outcome);
            if let Some(tracker) = solver.detach_tracker() {
                print!("{tracker}");
            }
        }
        Command::Step { input } => {
            let mut solver = build_solver(&cli.pipeline)?;
            load_input(&mut solver, input)?;
            let outcome = solver.step();
            match solver.steps().last() {
                Some(report) => println!("{report}"),
                None => println!("no step available"),
            }
            print_outcome(&solver, &outcome);
            println!("state: {}", solver.grid().snapshot());
        }
        Command::Count { puzzle, cap, print } => {
            let grid: DigitGrid = puzzle.parse()?;
            let (count, solutions) = count_solutions(&grid, *cap, *print);
            println!("solutions: {count}");
            for solution in &solutions {
                println!("{solution}");
            }
        }
        Command::Generate {
            seed,
            phrase,
            max_difficulty,
            count,
        } => {
            let solver = build_solver(&cli.pipeline)?;
            let solver = limit_difficulty(solver, (*max_difficulty).into());
            let generator = PuzzleGenerator::new(&solver);
            let first = match (seed, phrase) {
                (Some(seed), _) => seed.parse()?,
                (None, Some(phrase)) => PuzzleSeed::from_phrase(phrase),
                (None, None) => PuzzleSeed::random(),
            };
            for i in 0..*count {
                let seed = if i == 0 { first } else { PuzzleSeed::random() };
                let puzzle = generator.generate_with_seed(seed);
                let hardest = puzzle
                    .hardest
                    .map_or_else(|| "none".to_owned(), |d| d.to_string());
                println!("seed: {}", puzzle.seed);
                println!("problem: {}", puzzle.problem);
                println!("solution: {}", puzzle.solution);
                println!("clues: {}, hardest: {hardest}", puzzle.problem.filled_count());
            }
        }
        Command::Batch { file, stats } => {
            let solver = build_solver(&cli.pipeline)?;
            let text = batch::read_input(file)?;
            let summary = batch::solve_all(&solver, &text);
            let mut out = std::io::stdout().lock();
            for line in &summary.lines {
                // Output errors such as a closed pipe end the listing.
                if writeln!(out, "{line}").is_err() {
                    break;
                }
            }
            drop(out);
            if *stats {
                print!("{}", summary.tracker);
            } else {
                let puzzles = summary.tracker.puzzles();
                println!(
                    "{} solved, {} stuck, {} contradictory, {} unreadable",
                    puzzles.solved, puzzles.stuck, puzzles.contradictions, summary.unreadable
                );
            }
        }
        Command::Presets => {
            let presets = StrategyRegistry::standard().default_preset();
            println!("{}", serde_json::to_string_pretty(&presets)?);
        }
    }
    Ok(())
}

/// Builds the pipeline from the standard registry or a preset file.
///
/// # Errors
///
/// Returns an error if the preset file cannot be read, is not valid JSON or names an
/// unknown strategy.
pub fn build_solver(args: &PipelineArgs) -> Result<StrategySolver, CliError> {
    let registry = StrategyRegistry::standard();
    let mut solver = match &args.preset {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            let presets: Vec<StrategyPreset> = serde_json::from_str(&text)?;
            log::debug!("loaded {} presets from {}", presets.len(), path.display());
            StrategySolver::new(registry.build(&presets)?)
        }
        None => StrategySolver::standard(),
    };
    solver.set_assume_unique(!args.no_uniqueness);
    Ok(solver)
}

fn load_input(solver: &mut StrategySolver, input: &GridInput) -> Result<(), CliError> {
    if input.state {
        let state: GridState = input.grid.parse()?;
        solver.set_state(&state);
    } else {
        let grid: DigitGrid = input.grid.parse()?;
        solver.set_grid(&grid);
    }
    Ok(())
}

/// Counts up to `cap` solutions, keeping them only when they are to be printed.
fn count_solutions(grid: &DigitGrid, cap: usize, keep: bool) -> (usize, Vec<DigitGrid>) {
    let backtracker = Backtracker::new();
    if keep {
        let solutions = backtracker.solutions(grid, cap);
        (solutions.len(), solutions)
    } else {
        (backtracker.count_solutions(grid, cap), Vec::new())
    }
}

fn limit_difficulty(mut solver: StrategySolver, max: Difficulty) -> StrategySolver {
    for strategy in solver.strategies_mut() {
        if strategy.difficulty() > max && !strategy.set_enabled(false) {
            log::warn!("{} is locked and stays enabled", strategy.name());
        }
    }
    solver
}

fn print_outcome(solver: &StrategySolver, outcome: &SolveOutcome) {
    let status = match &outcome.status {
        SolveStatus::Solved => "solved".to_owned(),
        SolveStatus::Stuck => "stuck".to_owned(),
        SolveStatus::Stopped => "stopped".to_owned(),
        SolveStatus::Contradiction(err) => format!("contradiction ({err})"),
    };
    let hardest = outcome
        .hardest
        .map_or_else(|| "none".to_owned(), |d| d.to_string());
    println!("status: {status}");
    println!("steps: {}, hardest: {hardest}", outcome.steps_taken);
    println!("grid: {}", solver.grid().to_digit_grid());
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory as _, Parser as _};

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "numera",
            "generate",
            "--phrase",
            "hello",
            "--max-difficulty",
            "hard",
            "--no-uniqueness",
        ])
        .unwrap();
        assert!(cli.pipeline.no_uniqueness);
        let Command::Generate {
            phrase,
            max_difficulty,
            count,
            ..
        } = cli.command
        else {
            panic!("expected generate");
        };
        assert_eq!(phrase.as_deref(), Some("hello"));
        assert_eq!(max_difficulty, Level::Hard);
        assert_eq!(count, 1);

        assert!(
            Cli::try_parse_from(["numera", "generate", "--seed", "00", "--phrase", "x"]).is_err()
        );
    }

    #[test]
    fn test_count_keeps_solutions_only_for_printing() {
        let grid: DigitGrid =
            ".9.2.......1..693..3.71..8.35........48..2.6...7......56....4......4.2..2...3.6.7"
                .parse()
                .unwrap();
        let (count, kept) = count_solutions(&grid, 30, false);
        assert_eq!(count, 26);
        assert!(kept.is_empty());

        let (count, kept) = count_solutions(&grid, 5, true);
        assert_eq!(count, 5);
        assert_eq!(kept.len(), 5);
        assert!(kept.iter().all(DigitGrid::is_solved));
    }

    #[test]
    fn test_limit_difficulty_keeps_locked() {
        let args = PipelineArgs {
            preset: None,
            no_uniqueness: false,
        };
        let solver = limit_difficulty(build_solver(&args).unwrap(), Difficulty::Easy);
        for strategy in solver.strategies() {
            let expected = strategy.difficulty() <= Difficulty::Easy;
            assert_eq!(strategy.is_enabled(), expected, "{}", strategy.name());
        }
    }

    #[test]
    fn test_missing_preset_file() {
        let args = PipelineArgs {
            preset: Some("/nonexistent/numera-presets.json".into()),
            no_uniqueness: false,
        };
        assert!(matches!(build_solver(&args), Err(CliError::Read { .. })));
    }
}
