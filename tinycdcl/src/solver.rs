//! The solver facade: the public entry point tying the core's internal modules together.

use std::io;

use anyhow::Error;
use log::info;

use tinycdcl_dimacs::DimacsParser;
use tinycdcl_formula::{CnfFormula, Lit, Var};

use crate::cdcl;
pub use crate::cdcl::SolveResult;
use crate::config::SolverConfig;
use crate::context::Context;
use crate::error::SolverError;
use crate::incremental;
use crate::load::{add_clause, finish_loading};
use crate::state::SatState;
use crate::stats::Stats;

/// A Boolean satisfiability solver.
///
/// Owns all search state directly (the clause database arena, watch lists, trail, VMTF list,
/// restart schedule and statistics); there is no shared or external state to coordinate. The
/// solver is built lazily: it does not allocate its internal arrays until the first clause,
/// assumption, or `solve` call tells it how many variables it needs to support.
#[derive(Default)]
pub struct Solver {
    config: SolverConfig,
    ctx: Option<Context>,
    loading_finished: bool,
}

impl Solver {
    /// Creates a new solver with the default configuration.
    pub fn new() -> Solver {
        Solver::default()
    }

    /// Creates a new solver with the given configuration.
    pub fn with_config(config: SolverConfig) -> Solver {
        Solver {
            config,
            ctx: None,
            loading_finished: false,
        }
    }

    /// Read-only access to the solver's configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Returns the internal context, building it sized for at least `var_count` variables if it
    /// does not exist yet.
    ///
    /// Once built, the context's variable count is fixed: its arrays are sized once, up front,
    /// rather than resized on demand. A later reference to a variable beyond that count is
    /// reported as [`SolverError::VariableOutOfRange`].
    fn context_for(&mut self, var_count: usize) -> Result<&mut Context, SolverError> {
        if self.ctx.is_none() {
            self.ctx = Some(Context::new(self.config, var_count));
        }
        let ctx = self.ctx.as_mut().unwrap();
        ctx.state.check_poisoned()?;
        if var_count > ctx.var_count {
            return Err(SolverError::VariableOutOfRange);
        }
        Ok(ctx)
    }

    /// Adds every clause of `formula` to the solver.
    ///
    /// Must be called before the first call to [`solve`](Solver::solve) or
    /// [`solve_limited`](Solver::solve_limited); this core does not support adding irredundant
    /// clauses once search has begun.
    pub fn add_formula(&mut self, formula: &CnfFormula) -> Result<(), SolverError> {
        let ctx = self.context_for(formula.var_count())?;
        for clause in formula.iter() {
            if let Err(err) = add_clause(ctx, clause) {
                ctx.state.poisoned = true;
                return Err(err);
            }
        }
        info!(
            "added formula with {} variables and {} clauses",
            formula.var_count(),
            formula.len()
        );
        Ok(())
    }

    /// Reads and adds a formula in DIMACS CNF format, streaming the parser rather than
    /// materializing the whole formula up front.
    pub fn add_dimacs_cnf(&mut self, input: impl io::Read) -> Result<(), Error> {
        use io::BufRead;

        let mut buffer = io::BufReader::new(input);
        let mut parser = DimacsParser::new();

        loop {
            let data = buffer.fill_buf()?;
            if data.is_empty() {
                break;
            }
            parser.parse_chunk(data)?;
            let len = data.len();
            buffer.consume(len);

            self.add_formula(&parser.take_formula())?;
        }
        parser.eof()?;
        self.add_formula(&parser.take_formula())?;
        parser.check_header()?;

        info!(
            "parsed formula with {} variables and {} clauses",
            parser.var_count(),
            parser.clause_count()
        );

        Ok(())
    }

    /// Replaces the current assumptions with `lits`, to be forced true at the start of the next
    /// [`solve`](Solver::solve) call.
    pub fn assume(&mut self, lits: &[Lit]) -> Result<(), SolverError> {
        let needed = lits.iter().map(|lit| lit.var().index()).max().unwrap_or(0);
        let ctx = self.context_for(needed)?;
        incremental::set_assumptions(ctx, lits);
        Ok(())
    }

    /// Clears all assumptions.
    pub fn reset_assumptions(&mut self) {
        if let Some(ctx) = &mut self.ctx {
            incremental::reset_assumptions(ctx);
        }
    }

    /// Checks satisfiability of the formula under the current assumptions, without a conflict
    /// budget.
    pub fn solve(&mut self) -> Result<SolveResult, SolverError> {
        self.solve_limited(-1)
    }

    /// Checks satisfiability, stopping with [`SolveResult::Unknown`] once `conflict_limit`
    /// conflicts have been spent since this call began. A negative limit means unbounded.
    pub fn solve_limited(&mut self, conflict_limit: i64) -> Result<SolveResult, SolverError> {
        let ctx = self.context_for(0)?;
        if !self.loading_finished {
            finish_loading(ctx);
            self.loading_finished = true;
        }
        match cdcl::solve(ctx, conflict_limit) {
            Ok(result) => Ok(result),
            Err(err) => {
                ctx.state.poisoned = true;
                Err(err)
            }
        }
    }

    /// The satisfying assignment from the most recent `Sat` result, one literal per variable.
    pub fn model(&self) -> Option<Vec<Lit>> {
        let ctx = self.ctx.as_ref()?;
        if ctx.state.sat_state != SatState::Sat {
            return None;
        }
        Some(
            (1..=ctx.var_count)
                .map(|index| {
                    let var = Var::from_index(index);
                    var.lit(ctx.assignment.saved_phase(var))
                })
                .collect(),
        )
    }

    /// Reads the final phase of a single variable after a `Sat` result.
    ///
    /// Returns `None` if the solver has not found a model, or if `var` was never referenced by
    /// any clause or assumption.
    pub fn get_model(&self, var: Var) -> Option<bool> {
        let ctx = self.ctx.as_ref()?;
        if ctx.state.sat_state != SatState::Sat || var.index() > ctx.var_count {
            return None;
        }
        Some(ctx.assignment.saved_phase(var))
    }

    /// The final-conflict clause from the most recent `Unsat`-under-assumptions result: the
    /// complements of the assumptions that were actually needed to derive the conflict.
    pub fn failed_core(&self) -> Option<&[Lit]> {
        let ctx = self.ctx.as_ref()?;
        if ctx.state.sat_state == SatState::UnsatUnderAssumptions {
            Some(&ctx.failed_core)
        } else {
            None
        }
    }

    /// A snapshot of the solver's running statistics.
    pub fn stats(&self) -> Stats {
        self.ctx.as_ref().map(|ctx| ctx.stats.clone()).unwrap_or_default()
    }
}
