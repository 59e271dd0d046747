//! The solver's internal state, gathered into one struct.
//!
//! Every solving routine takes `&mut Context` instead of splitting borrows across a generic
//! compile-time-checked set of sub-structures: with a single flat clause arena and no concurrent
//! access between solving phases, a plain `&mut Context` is both simpler and matches how the
//! algorithms this crate implements were originally written, each taking a single `struct solver
//! *S` parameter.

use tinycdcl_formula::Lit;

use crate::clause::db::ClauseDb;
use crate::config::SolverConfig;
use crate::decision::vmtf::Vmtf;
use crate::prop::assignment::Assignment;
use crate::prop::watch::Watchlists;
use crate::schedule::Schedule;
use crate::state::SolverState;
use crate::stats::Stats;

/// All solver state, built once a variable count is known.
pub struct Context {
    pub config: SolverConfig,
    pub var_count: usize,
    pub clause_db: ClauseDb,
    pub watches: Watchlists,
    pub assignment: Assignment,
    pub vmtf: Vmtf,
    pub schedule: Schedule,
    pub state: SolverState,
    pub stats: Stats,
    /// Current assumption literals, set by `Solver::assume`.
    pub assumptions: Vec<Lit>,
    /// Number of assumption literals already pushed onto the trail by
    /// [`crate::incremental::enqueue_assumptions`].
    pub assumptions_enqueued: usize,
    /// Failed-assumption core from the most recent UNSAT-under-assumptions result.
    pub failed_core: Vec<Lit>,
}

impl Context {
    pub fn new(config: SolverConfig, var_count: usize) -> Context {
        let clause_db = ClauseDb::new(
            config.initial_mem_max,
            config.max_mem_max,
            config.mem_growth_factor,
            config.initial_max_lemmas,
        );
        Context {
            config,
            var_count,
            clause_db,
            watches: Watchlists::new(var_count),
            assignment: Assignment::new(var_count),
            vmtf: Vmtf::new(var_count),
            schedule: Schedule::new(),
            state: SolverState::default(),
            stats: Stats::default(),
            assumptions: Vec::new(),
            assumptions_enqueued: 0,
            failed_core: Vec::new(),
        }
    }
}
