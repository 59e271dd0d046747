//! Watch lists: for every literal, the singly-linked list of clauses watching it.
//!
//! Each clause's own two link cells (see [`crate::clause`]) double as the list nodes, so no
//! separate allocation is needed per watch. Lists are LIFO: a clause is always linked onto the
//! front of the lists of the two literals it watches, and never moves within a list except by
//! being unlinked and relinked elsewhere.

use tinycdcl_formula::Lit;

use crate::clause::db::ClauseDb;
use crate::clause::ClauseRef;

/// Watch-list heads, indexed by literal.
pub struct Watchlists {
    first: Vec<ClauseRef>,
    bias: usize,
}

impl Watchlists {
    pub fn new(max_var: usize) -> Watchlists {
        Watchlists {
            first: vec![ClauseRef::END; 2 * max_var + 1],
            bias: max_var,
        }
    }

    fn slot(&self, lit: Lit) -> usize {
        (lit.offset() + self.bias as isize) as usize
    }

    /// Head of the watch list for `lit`.
    pub fn head(&self, lit: Lit) -> ClauseRef {
        self.first[self.slot(lit)]
    }

    /// Replaces the head of the watch list for `lit`.
    pub fn set_head(&mut self, lit: Lit, cref: ClauseRef) {
        let slot = self.slot(lit);
        self.first[slot] = cref;
    }

    /// Which of a clause's two link cells belongs to the watch list of `lit`.
    ///
    /// By invariant, a watched clause's first two literals are exactly the two literals it is
    /// watched on, so the slot is found by comparing against them rather than needing a separate
    /// side table (the original solver instead relies on a pointer-arithmetic trick over
    /// adjacent memory; comparing literals directly is equivalent and does not depend on layout).
    pub(crate) fn link_slot(db: &ClauseDb, cref: ClauseRef, lit: Lit) -> usize {
        if db.lits(cref)[0] == lit {
            0
        } else {
            debug_assert_eq!(db.lits(cref)[1], lit);
            1
        }
    }

    /// Links `cref` onto the front of the watch list for `lit`. `cref` must be a clause of size
    /// greater than one whose first or second literal is `lit`.
    pub fn watch(&mut self, db: &mut ClauseDb, lit: Lit, cref: ClauseRef) {
        let slot = Self::link_slot(db, cref, lit);
        let old_head = self.head(lit);
        db.set_link(cref, slot, old_head);
        self.set_head(lit, cref);
    }

    /// Removes every watch-list node referring to a clause at or past `boundary` (used before
    /// compacting the learned-clause region of the arena). A list can interleave irredundant and
    /// redundant clauses in either order (a clause is always relinked onto the *front* of
    /// whichever list it newly watches, regardless of whether it is irredundant or redundant), so
    /// this splices the full chain rather than assuming redundant entries are contiguous at the
    /// head.
    pub fn purge_redundant(&mut self, db: &mut ClauseDb, boundary: usize) {
        for slot in 0..self.first.len() {
            let lit_value = slot as isize - self.bias as isize;
            if lit_value == 0 {
                continue;
            }
            let lit = Lit::from_raw(lit_value as i32);
            let mut cur = self.first[slot];
            let mut new_head = ClauseRef::END;
            let mut tail: Option<(ClauseRef, usize)> = None;
            while cur != ClauseRef::END {
                let link_slot = Self::link_slot(db, cur, lit);
                let next = db.link(cur, link_slot);
                if cur.index() < boundary {
                    match tail {
                        None => new_head = cur,
                        Some((p, pslot)) => db.set_link(p, pslot, cur),
                    }
                    tail = Some((cur, link_slot));
                }
                cur = next;
            }
            if let Some((p, pslot)) = tail {
                db.set_link(p, pslot, ClauseRef::END);
            }
            self.first[slot] = new_head;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tinycdcl_formula::Lit;

    fn clause(db: &mut ClauseDb, a: isize, b: isize, redundant: bool) -> ClauseRef {
        db.add_clause(&[Lit::from_dimacs(a), Lit::from_dimacs(b)], redundant)
            .unwrap()
    }

    /// A redundant clause relinked onto a list *after* an irredundant clause already sitting
    /// there (so the irredundant clause ends up as the head, with the redundant one behind it)
    /// must still be purged: `purge_redundant` cannot assume redundant entries are contiguous at
    /// the front of the list.
    #[test]
    fn purge_redundant_removes_entries_hidden_behind_an_irredundant_head() {
        let mut db = ClauseDb::new(64, 1 << 20, 1.5, 300);
        let mut watches = Watchlists::new(8);

        let shared = Lit::from_dimacs(5);

        let irredundant = clause(&mut db, 5, 1, false);
        watches.watch(&mut db, shared, irredundant);
        db.fix();

        let redundant = clause(&mut db, 5, 2, true);
        watches.watch(&mut db, shared, redundant);

        // List order is now [redundant, irredundant]. Relinking the irredundant clause (as
        // propagation would when its other watch changes) moves it back to the front without
        // touching the redundant entry behind it.
        watches.watch(&mut db, shared, irredundant);
        assert_eq!(watches.head(shared), irredundant);
        assert_eq!(db.link(irredundant, Watchlists::link_slot(&db, irredundant, shared)), redundant);

        watches.purge_redundant(&mut db, db.mem_fixed);

        // Only the irredundant clause should remain reachable from `shared`'s list.
        let mut seen = Vec::new();
        let mut cur = watches.head(shared);
        while cur != ClauseRef::END {
            seen.push(cur);
            let slot = Watchlists::link_slot(&db, cur, shared);
            cur = db.link(cur, slot);
        }
        assert_eq!(seen, vec![irredundant]);
    }
}
