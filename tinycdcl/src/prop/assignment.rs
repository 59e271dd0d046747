//! The trail of assigned literals and the per-variable assignment/analysis flags.
//!
//! Literal truth values live in a small byte array indexed by literal, mirroring the reference
//! solver's `false[]` array (`1` means "this literal is currently false", `0` means unassigned or
//! true). Conflict analysis needs two more pieces of transient, per-variable state while it walks
//! the trail: which variables have already been "seen" in the clause under construction, and a
//! memoized result of [`implied`](crate::analyze::implied)'s recursive self-subsumption check.
//! Those are kept in their own small arrays below rather than folded into the truth array, since
//! they can be set on a variable independent of (and sometimes while deciding) its current truth
//! value, which a shared encoding would make easy to get subtly wrong.
use tinycdcl_formula::{Lit, Var};

use crate::clause::ClauseRef;

const UNASSIGNED: u8 = 0;
const FALSE: u8 = 1;

/// The trail of satisfied literals plus the bookkeeping needed to undo them.
pub struct Assignment {
    /// Indexed by literal (biased): whether that literal is currently false.
    state: Vec<u8>,
    /// Indexed by 0-based variable index: the last (or current) phase, used for phase saving and
    /// for evaluating whether a learned clause's literals are satisfied by the saved model during
    /// database reduction.
    model: Vec<bool>,
    /// Indexed by 0-based variable index: the clause that forced this variable's assignment, or
    /// [`ClauseRef::NO_REASON`] for decisions and root-level units.
    reason: Vec<ClauseRef>,
    /// Indexed by 0-based variable index: trail position of a variable's current assignment,
    /// used by conflict analysis to find the most recent of a set of literals without rescanning
    /// the trail for each one.
    trail_pos: Vec<usize>,
    /// Indexed by 0-based variable index: set while a variable is part of the conflict clause
    /// currently being built by [`analyze`](crate::analyze::analyze).
    marked: Vec<bool>,
    /// Indexed by 0-based variable index: memoized result of the self-subsumption check, cleared
    /// together with `marked` once analysis of the current conflict finishes.
    implied_memo: Vec<Option<bool>>,
    /// Preallocated to the variable count; never reallocated once built, matching the reference
    /// solver's fixed `falseStack` buffer.
    trail: Vec<Lit>,
    /// Count of assignments since the last [`take_disagreements`](Assignment::take_disagreements)
    /// call whose polarity disagreed with the variable's previously saved phase, feeding the
    /// restart schedule's `not` statistic.
    disagreements: u64,
    /// Number of literals currently on the trail.
    assigned: usize,
    /// Number of trail literals already handed to unit propagation.
    processed: usize,
    /// Number of trail literals fixed at the root decision level; never undone by a backtrack.
    forced: usize,
    bias: usize,
}

impl Assignment {
    pub fn new(var_count: usize) -> Assignment {
        Assignment {
            state: vec![UNASSIGNED; 2 * var_count + 1],
            model: vec![false; var_count],
            reason: vec![ClauseRef::NO_REASON; var_count],
            trail_pos: vec![0; var_count],
            marked: vec![false; var_count],
            implied_memo: vec![None; var_count],
            trail: Vec::with_capacity(var_count),
            disagreements: 0,
            assigned: 0,
            processed: 0,
            forced: 0,
            bias: var_count,
        }
    }

    fn slot(&self, lit: Lit) -> usize {
        (lit.offset() + self.bias as isize) as usize
    }

    /// Whether `lit` is currently assigned false.
    #[inline]
    pub fn is_false(&self, lit: Lit) -> bool {
        self.state[self.slot(lit)] == FALSE
    }

    /// Whether `lit` is currently assigned true.
    #[inline]
    pub fn is_true(&self, lit: Lit) -> bool {
        self.state[self.slot(!lit)] == FALSE
    }

    /// Whether `lit` is currently unassigned.
    #[inline]
    pub fn is_unassigned(&self, lit: Lit) -> bool {
        !self.is_false(lit) && !self.is_true(lit)
    }

    pub fn is_var_unassigned(&self, var: Var) -> bool {
        self.is_unassigned(var.positive())
    }

    /// The last known (or current) phase for `var`, used for phase-saved decisions and for
    /// evaluating learned clauses against the saved model during database reduction.
    pub fn saved_phase(&self, var: Var) -> bool {
        self.model[var.index() - 1]
    }

    pub fn set_saved_phase(&mut self, var: Var, positive: bool) {
        self.model[var.index() - 1] = positive;
    }

    /// Assigns `lit` true, recording `reason` as the clause that forced it
    /// ([`ClauseRef::NO_REASON`] for a decision).
    pub fn assign(&mut self, lit: Lit, reason: ClauseRef) {
        let slot = self.slot(!lit);
        self.state[slot] = FALSE;
        let index = lit.var().index() - 1;
        if self.model[index] != lit.is_positive() {
            self.disagreements += 1;
        }
        self.model[index] = lit.is_positive();
        self.reason[index] = reason;
        self.trail_pos[index] = self.assigned;
        self.trail.push(lit);
        self.assigned += 1;
    }

    /// Returns the number of assignments since the last call whose polarity disagreed with the
    /// variable's previously saved phase, resetting the count to zero.
    pub fn take_disagreements(&mut self) -> u64 {
        let count = self.disagreements;
        self.disagreements = 0;
        count
    }

    pub fn reason(&self, var: Var) -> ClauseRef {
        self.reason[var.index() - 1]
    }

    /// Trail position of `var`'s current assignment. Only meaningful while `var` is assigned.
    pub fn trail_pos(&self, var: Var) -> usize {
        self.trail_pos[var.index() - 1]
    }

    pub fn is_decision(&self, var: Var) -> bool {
        self.reason(var) == ClauseRef::NO_REASON
    }

    /// Number of literals on the trail.
    pub fn len(&self) -> usize {
        self.assigned
    }

    pub fn is_empty(&self) -> bool {
        self.assigned == 0
    }

    /// The literal at trail position `pos`.
    pub fn trail_at(&self, pos: usize) -> Lit {
        self.trail[pos]
    }

    /// Number of trail literals not yet propagated.
    pub fn unprocessed(&self) -> usize {
        self.assigned - self.processed
    }

    /// Takes the next unprocessed trail literal and advances the propagation frontier.
    pub fn next_to_propagate(&mut self) -> Option<Lit> {
        if self.processed == self.assigned {
            None
        } else {
            let lit = self.trail[self.processed];
            self.processed += 1;
            Some(lit)
        }
    }

    /// Fixes the current trail length as the root decision level: a later
    /// [`backtrack_to`](Assignment::backtrack_to) can never undo literals assigned up to here.
    pub fn fix_root_level(&mut self) {
        self.forced = self.assigned;
    }

    pub fn root_level(&self) -> usize {
        self.forced
    }

    /// Undoes every assignment with trail position `>= pos`, restoring their cells to
    /// unassigned. `pos` must be `>= root_level()`.
    pub fn backtrack_to(&mut self, pos: usize) {
        debug_assert!(pos >= self.forced);
        while self.assigned > pos {
            self.assigned -= 1;
            let lit = self.trail[self.assigned];
            let slot = self.slot(!lit);
            self.state[slot] = UNASSIGNED;
        }
        if self.processed > self.assigned {
            self.processed = self.assigned;
        }
    }

    /// Marks `var` as reached while building the clause under analysis.
    pub fn mark(&mut self, var: Var) {
        self.marked[var.index() - 1] = true;
    }

    pub fn is_marked(&self, var: Var) -> bool {
        self.marked[var.index() - 1]
    }

    pub fn memo_implied(&mut self, var: Var, implied: bool) {
        self.implied_memo[var.index() - 1] = Some(implied);
    }

    pub fn implied_memo(&self, var: Var) -> Option<bool> {
        self.implied_memo[var.index() - 1]
    }

    /// Clears every mark and self-subsumption memo set while analyzing the current conflict.
    pub fn clear_analysis_flags(&mut self, vars: impl IntoIterator<Item = Var>) {
        for var in vars {
            let index = var.index() - 1;
            self.marked[index] = false;
            self.implied_memo[index] = None;
        }
    }
}
