//! Solving statistics.

/// Statistics gathered while solving.
///
/// Exposed to callers through [`Solver::stats`](crate::solver::Solver::stats) and printed by the
/// CLI's summary line.
#[derive(Clone, Default, Debug)]
pub struct Stats {
    /// Number of conflicts encountered so far.
    pub conflicts: u64,
    /// Number of decisions made so far.
    pub decisions: u64,
    /// Number of literals propagated so far.
    pub propagations: u64,
    /// Number of restarts performed so far.
    pub restarts: u64,
    /// Number of times the learned clause database has been reduced.
    pub reduce_db_calls: u64,
    /// Number of learned clauses currently retained after the last reduction.
    pub learned_clauses: u64,
    /// Current size of the clause database arena, in `i32` cells.
    pub mem_used: usize,
    /// Current lemma budget before the next reduction is triggered.
    pub max_lemmas: u64,
}
