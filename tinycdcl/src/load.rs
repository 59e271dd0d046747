//! Loading clauses into the database before search begins.
//!
//! Clauses are taken as given: no deduplication, tautology detection, or removal of clauses
//! already satisfied by a root-level unit is performed here. Unlike a general-purpose solver
//! meant to ingest arbitrary hand-written or generated CNF, this loader assumes its input is
//! already reasonably well formed, and simplifying it is out of scope.

use tinycdcl_formula::Lit;

use crate::clause::ClauseRef;
use crate::context::Context;

/// Adds one clause to the database.
///
/// A unit clause is asserted directly onto the trail (conflicting with an existing root-level
/// assignment is detected and turns the solver `Unsat` immediately). Clauses of two or more
/// literals are appended to the arena and watched on their first two literals.
///
/// Must only be called before the first call to [`solve`](crate::cdcl::solve), i.e. while
/// `assignment.root_level()` is still the true root.
pub fn add_clause(ctx: &mut Context, lits: &[Lit]) -> Result<(), crate::error::SolverError> {
    if lits.is_empty() {
        ctx.state.sat_state = crate::state::SatState::Unsat;
        return Ok(());
    }

    if lits.len() == 1 {
        let lit = lits[0];
        if ctx.assignment.is_false(lit) {
            ctx.state.sat_state = crate::state::SatState::Unsat;
        } else if ctx.assignment.is_unassigned(lit) {
            let cref = ctx.clause_db.add_clause(lits, false)?;
            ctx.assignment.assign(lit, cref);
        }
        return Ok(());
    }

    let cref = ctx.clause_db.add_clause(lits, false)?;
    let (l0, l1) = {
        let stored = ctx.clause_db.lits(cref);
        (stored[0], stored[1])
    };
    ctx.watches.watch(&mut ctx.clause_db, l0, cref);
    ctx.watches.watch(&mut ctx.clause_db, l1, cref);
    Ok(())
}

/// Marks the current arena high-water mark as the boundary between the original formula and
/// learned clauses. Call once after every original clause has been loaded.
pub fn finish_loading(ctx: &mut Context) {
    ctx.clause_db.fix();
    ctx.assignment.fix_root_level();
}
