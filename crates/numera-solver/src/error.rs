use numera_core::{ConsistencyError, NotationError};

/// Errors that can occur while configuring or driving the solver.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SolverError {
    /// The grid contradicts itself.
    #[display("inconsistent grid: {_0}")]
    Inconsistent(#[from] ConsistencyError),
    /// A preset names a strategy the registry does not know.
    #[display("unknown strategy: {name}")]
    UnknownStrategy {
        /// The requested name.
        name: String,
    },
    /// A strategy setting has an unknown key or an out-of-range value.
    #[display("invalid setting {key}={value} for {strategy}: {reason}")]
    InvalidSetting {
        /// The strategy being configured.
        strategy: String,
        /// The setting key.
        key: String,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// A grid notation could not be parsed.
    #[display("{_0}")]
    Notation(#[from] NotationError),
}
