use std::{io, path::PathBuf};

use numera_core::NotationError;
use numera_generator::SeedParseError;
use numera_solver::SolverError;

/// Errors reported by the command-line front end.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CliError {
    /// A file could not be read.
    #[display("failed to read {}: {source}", path.display())]
    Read {
        /// The file.
        path: PathBuf,
        /// The I/O error.
        source: io::Error,
    },
    /// A preset file is not valid JSON.
    #[display("invalid preset file: {_0}")]
    Preset(#[from] serde_json::Error),
    /// A grid could not be parsed.
    #[display("invalid grid: {_0}")]
    Notation(#[from] NotationError),
    /// The solver rejected its configuration.
    #[display("{_0}")]
    Solver(#[from] SolverError),
    /// A seed could not be parsed.
    #[display("invalid seed: {_0}")]
    Seed(#[from] SeedParseError),
}
