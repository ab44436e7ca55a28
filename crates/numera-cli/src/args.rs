use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use numera_solver::Difficulty;

/// Solve, rate and generate Sudoku puzzles with human-style strategies.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Pipeline options shared by every command.
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Options that shape the strategy pipeline.
#[derive(Debug, Args)]
pub struct PipelineArgs {
    /// JSON file with the ordered strategy presets to run instead of the standard set.
    #[arg(long, global = true, value_name = "FILE")]
    pub preset: Option<PathBuf>,

    /// Skip strategies that are only valid for puzzles with a unique solution.
    #[arg(long, global = true)]
    pub no_uniqueness: bool,
}

/// What to do.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Solve a puzzle as far as the strategies go.
    Solve {
        /// The grid to solve.
        #[command(flatten)]
        input: GridInput,

        /// Print every step taken.
        #[arg(short, long)]
        steps: bool,

        /// Print per-strategy statistics.
        #[arg(long)]
        stats: bool,
    },
    /// Take one step and explain it.
    Step {
        /// The grid to step.
        #[command(flatten)]
        input: GridInput,
    },
    /// Count the solutions of a puzzle by backtracking.
    Count {
        /// The puzzle, 81 characters with `.` or `0` for empty cells.
        puzzle: String,

        /// Stop after this many solutions.
        #[arg(long, value_name = "N", default_value_t = 2)]
        cap: usize,

        /// Print the solutions found.
        #[arg(short, long)]
        print: bool,
    },
    /// Generate puzzles the pipeline can solve.
    Generate {
        /// Hex seed to reproduce a puzzle.
        #[arg(long, value_name = "HEX", conflicts_with = "phrase")]
        seed: Option<String>,

        /// Derive the seed from a phrase.
        #[arg(long, value_name = "TEXT")]
        phrase: Option<String>,

        /// Only use strategies up to this difficulty.
        #[arg(long, value_name = "LEVEL", default_value = "extreme")]
        max_difficulty: Level,

        /// Number of puzzles to generate. Seeds after the first are random.
        #[arg(short = 'n', long, value_name = "N", default_value_t = 1)]
        count: usize,
    },
    /// Solve every puzzle of a file in parallel, one puzzle per line.
    Batch {
        /// Puzzle file, or `-` for standard input.
        file: PathBuf,

        /// Print per-strategy statistics of the whole batch.
        #[arg(long)]
        stats: bool,
    },
    /// Print the standard strategy presets as JSON.
    Presets,
}

/// A grid given on the command line.
#[derive(Debug, Args)]
pub struct GridInput {
    /// The puzzle, 81 characters with `.` or `0` for empty cells.
    pub grid: String,

    /// Read the grid as a full candidate state instead of givens.
    #[arg(long)]
    pub state: bool,
}

/// Strategy difficulty levels accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Level {
    /// Singles only.
    Basic,
    /// Locked candidates and pairs.
    Easy,
    /// Triples, quads and X-Wing.
    Medium,
    /// Wings and single-digit patterns.
    Hard,
    /// Coloring and chains.
    Extreme,
    /// Forcing nets.
    Inhuman,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Basic => Self::Basic,
            Level::Easy => Self::Easy,
            Level::Medium => Self::Medium,
            Level::Hard => Self::Hard,
            Level::Extreme => Self::Extreme,
            Level::Inhuman => Self::Inhuman,
        }
    }
}
