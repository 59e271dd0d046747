//! Bookkeeping for assumption-based incremental solving.

use tinycdcl_formula::Lit;

use crate::clause::ClauseRef;
use crate::context::Context;
use crate::state::SatState;

/// Outcome of trying to push the next pending assumption onto the trail.
pub enum EnqueueAssumption {
    /// The assumption was unassigned and has been pushed as a decision-like literal.
    Enqueued,
    /// The assumption is already false; carries the assumption literal that conflicts.
    Conflict(Lit),
    /// Every assumption has already been enqueued (directly or as already implied).
    Done,
}

/// Pushes the next pending assumption literal onto the trail, skipping any that are already
/// satisfied by the current assignment, whether due to an earlier assumption or to propagation
/// from the formula.
///
/// Called repeatedly (once per [`crate::cdcl::solve`] loop iteration where propagation found
/// nothing left to do) until it returns [`EnqueueAssumption::Done`] or
/// [`EnqueueAssumption::Conflict`].
pub fn enqueue_assumption(ctx: &mut Context) -> EnqueueAssumption {
    loop {
        if ctx.assumptions_enqueued >= ctx.assumptions.len() {
            return EnqueueAssumption::Done;
        }
        let lit = ctx.assumptions[ctx.assumptions_enqueued];
        if ctx.assignment.is_false(lit) {
            return EnqueueAssumption::Conflict(lit);
        }
        ctx.assumptions_enqueued += 1;
        if ctx.assignment.is_true(lit) {
            continue;
        }
        ctx.assignment.assign(lit, ClauseRef::NO_REASON);
        ctx.schedule.record_assigned(1);
        ctx.schedule
            .record_disagreements(ctx.assignment.take_disagreements());
        return EnqueueAssumption::Enqueued;
    }
}

/// Replaces the current assumptions. The search restarts from the root so the new assumptions
/// take effect from the beginning of the next [`crate::cdcl::solve`] call.
pub fn set_assumptions(ctx: &mut Context, assumptions: &[Lit]) {
    full_restart(ctx);
    ctx.assumptions = assumptions.to_vec();
    ctx.assumptions_enqueued = 0;
    ctx.failed_core.clear();
}

/// Clears all assumptions. Equivalent to `set_assumptions(ctx, &[])`.
pub fn reset_assumptions(ctx: &mut Context) {
    set_assumptions(ctx, &[]);
}

/// Undoes every assignment above the root level and, if the solver had previously settled on
/// `Sat` or `UnsatUnderAssumptions`, reopens the search. A hard `Unsat` verdict is about the
/// formula itself and is never reopened by a change of assumptions.
fn full_restart(ctx: &mut Context) {
    let root = ctx.assignment.root_level();
    ctx.assignment.backtrack_to(root);
    match ctx.state.sat_state {
        SatState::Sat | SatState::UnsatUnderAssumptions => {
            ctx.state.sat_state = SatState::Unknown;
        }
        SatState::Unknown | SatState::Unsat => {}
    }
}
