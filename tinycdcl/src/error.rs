//! Errors produced by the solving core.

use thiserror::Error;

/// Errors that can occur while loading a formula or solving it.
#[derive(Error, Debug)]
pub enum SolverError {
    /// The clause database arena would have to grow past the configured hard limit.
    #[error("clause database exceeded the memory limit of {limit} cells")]
    OutOfMemory {
        /// The configured hard limit, in `i32` cells.
        limit: usize,
    },

    /// A literal or assumption referenced a variable index larger than can be represented.
    #[error("variable index is out of the representable range")]
    VariableOutOfRange,

    /// An operation was attempted on a solver that previously failed and is no longer usable.
    #[error("solver is poisoned by a previous error and cannot be used further")]
    Poisoned,
}
