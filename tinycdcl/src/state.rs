//! Miscellaneous solver state.

/// Satisfiability state.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SatState {
    Unknown,
    Sat,
    Unsat,
    UnsatUnderAssumptions,
}

impl Default for SatState {
    fn default() -> SatState {
        SatState::Unknown
    }
}

/// Miscellaneous solver state.
///
/// Anything larger or any larger group of related state variables should be moved into a separate
/// part of [`Context`](crate::context::Context).
#[derive(Default)]
pub struct SolverState {
    pub sat_state: SatState,
    /// Set once a [`SolverError`](crate::error::SolverError) has escaped a public API call. A
    /// poisoned solver refuses all further calls since its internal state is no longer trusted.
    pub poisoned: bool,
}

impl SolverState {
    /// Returns an error if the solver was previously poisoned by a failed operation.
    pub fn check_poisoned(&self) -> Result<(), crate::error::SolverError> {
        if self.poisoned {
            Err(crate::error::SolverError::Poisoned)
        } else {
            Ok(())
        }
    }
}
