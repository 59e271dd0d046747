//! Conflict analysis: first-UIP clause learning, self-subsuming minimization, and extraction of
//! the failed-assumption core.

use tinycdcl_formula::{Lit, Var};

use crate::clause::db::ClauseDb;
use crate::clause::ClauseRef;
use crate::decision::vmtf::Vmtf;
use crate::prop::assignment::Assignment;

/// Result of analyzing a conflict: the learned clause (the asserting literal first) and the
/// trail position to backtrack to before re-asserting it.
pub struct Analysis {
    pub learned: Vec<Lit>,
    pub backjump_to: usize,
}

/// Builds the first-UIP clause implied by the conflict at `conflict`, backjumps computed from the
/// current trail, bumping every variable that ends up in the learned clause.
///
/// Walks the trail from the most recently assigned literal backward, resolving the reason clause
/// of every marked variable *at the current decision level* until exactly one such variable
/// remains to resolve: that variable (the first unique implication point) becomes the asserting
/// literal of the learned clause. A marked variable from an earlier decision level is never
/// resolved through its reason, regardless of whether it has one, and goes straight into the
/// clause instead: resolving it further could walk resolution past the current level's own
/// decision and produce a clause that is not actually a 1-UIP clause of this conflict.
pub fn analyze(
    db: &ClauseDb,
    assignment: &mut Assignment,
    vmtf: &mut Vmtf,
    conflict: ClauseRef,
) -> Analysis {
    let mut seen = Vec::new();
    let mut kept = Vec::new();
    let mut pending = 0usize;

    let current_level_start = current_level_start(assignment);

    mark(
        assignment,
        &mut seen,
        &mut kept,
        &mut pending,
        current_level_start,
        None,
        db.lits(conflict),
    );

    let mut idx = assignment.len();
    let uip_lit;
    loop {
        idx -= 1;
        let trail_lit = assignment.trail_at(idx);
        let var = trail_lit.var();
        if !assignment.is_marked(var) {
            continue;
        }
        debug_assert!(idx >= current_level_start);
        pending -= 1;
        if pending == 0 {
            uip_lit = !trail_lit;
            break;
        }
        let reason = assignment.reason(var);
        if reason != ClauseRef::NO_REASON {
            mark(
                assignment,
                &mut seen,
                &mut kept,
                &mut pending,
                current_level_start,
                Some(var),
                db.lits(reason),
            );
        }
    }

    let root_level = assignment.root_level();
    kept.retain(|&lit| !implied(db, assignment, lit.var(), root_level));

    let backjump_to = kept
        .iter()
        .map(|lit| assignment.trail_pos(lit.var()))
        .max()
        .map(|pos| pos + 1)
        .unwrap_or(root_level);

    vmtf.bump(uip_lit.var());
    for &lit in &kept {
        vmtf.bump(lit.var());
    }

    assignment.clear_analysis_flags(seen);

    let mut learned = Vec::with_capacity(kept.len() + 1);
    learned.push(uip_lit);
    learned.extend(kept);

    Analysis {
        learned,
        backjump_to,
    }
}

/// Trail position where the current decision level begins: the most recent trail entry with no
/// reason (a decision, or an assumption enqueued as one). Everything at or above this position
/// belongs to the level the conflict was found at; everything below it belongs to an earlier
/// level. Falls back to `root_level()` if no such entry exists, which cannot happen when `analyze`
/// is called (the caller only does so once at least one decision separates the trail from the
/// root), but keeps this total rather than panicking.
fn current_level_start(assignment: &Assignment) -> usize {
    let root = assignment.root_level();
    let mut idx = assignment.len();
    while idx > root {
        idx -= 1;
        if assignment.reason(assignment.trail_at(idx).var()) == ClauseRef::NO_REASON {
            return idx;
        }
    }
    root
}

/// Marks every not-yet-seen literal of `lits`, skipping `skip`'s own variable if given (used when
/// resolving a reason clause, to avoid re-marking the variable being resolved on). A freshly
/// marked variable at or above `current_level_start` joins the active resolution count; one from
/// an earlier level is pushed straight into `kept` instead, since it is never resolved further.
fn mark(
    assignment: &mut Assignment,
    seen: &mut Vec<Var>,
    kept: &mut Vec<Lit>,
    pending: &mut usize,
    current_level_start: usize,
    skip: Option<Var>,
    lits: &[Lit],
) {
    for &lit in lits {
        let var = lit.var();
        if Some(var) == skip || assignment.is_marked(var) {
            continue;
        }
        assignment.mark(var);
        seen.push(var);
        if assignment.trail_pos(var) >= current_level_start {
            *pending += 1;
        } else {
            kept.push(lit);
        }
    }
}

/// Recursive self-subsumption check: a marked variable's literal is redundant in the clause under
/// construction if every other literal of its reason clause is itself marked or transitively
/// implied by other marked literals. Results are memoized on `assignment` for the duration of the
/// current analysis (callers must clear analysis flags afterward).
fn implied(db: &ClauseDb, assignment: &mut Assignment, var: Var, root_level: usize) -> bool {
    if let Some(memoized) = assignment.implied_memo(var) {
        return memoized;
    }
    let reason = assignment.reason(var);
    if reason == ClauseRef::NO_REASON {
        assignment.memo_implied(var, false);
        return false;
    }
    for &lit in db.lits(reason) {
        let rvar = lit.var();
        if rvar == var || assignment.is_marked(rvar) {
            continue;
        }
        if assignment.trail_pos(rvar) < root_level {
            // Fixed at the root: can never be undone, so it can't block subsumption.
            continue;
        }
        if !implied(db, assignment, rvar, root_level) {
            assignment.memo_implied(var, false);
            return false;
        }
    }
    assignment.memo_implied(var, true);
    true
}

/// Extracts the subset of assumptions responsible for a falsified assumption literal, for use
/// when `lit` is found false while enqueuing assumptions (no conflicting clause is involved).
///
/// The buffer is seeded with `!lit`. Marks are then propagated from each marked literal back
/// through its reason; a literal with no reason is itself an assumption (no real decisions exist
/// yet at this point in the search) and contributes its own complement to the buffer. Every
/// literal above the root level is unassigned once the walk completes.
pub fn analyze_final(db: &ClauseDb, assignment: &mut Assignment, lit: Lit) -> Vec<Lit> {
    let mut seen = Vec::new();
    let mut core = vec![!lit];

    let var = lit.var();
    assignment.mark(var);
    seen.push(var);

    let root_level = assignment.root_level();
    let mut idx = assignment.len();
    while idx > root_level {
        idx -= 1;
        let trail_lit = assignment.trail_at(idx);
        let var = trail_lit.var();
        if !assignment.is_marked(var) {
            continue;
        }
        let reason = assignment.reason(var);
        if reason == ClauseRef::NO_REASON {
            core.push(!trail_lit);
        } else {
            for &rlit in db.lits(reason) {
                let rvar = rlit.var();
                if rvar != var && !assignment.is_marked(rvar) {
                    assignment.mark(rvar);
                    seen.push(rvar);
                }
            }
        }
    }

    assignment.clear_analysis_flags(seen);
    assignment.backtrack_to(root_level);
    core
}
