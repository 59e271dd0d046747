//! The flat clause-database arena.

use tinycdcl_formula::Lit;

use crate::clause::ClauseRef;
use crate::error::SolverError;

/// Number of cells reserved at the front of every clause for watch-list links.
const LINK_CELLS: usize = 2;

/// Append-only arena storing every clause (original and learned) as runs of `i32` cells.
///
/// Index `0` is reserved and never the base of a real clause, so [`ClauseRef::NO_REASON`] (which
/// is `ClauseRef(0)`) can double as "no reason clause" without colliding with a real reference.
pub struct ClauseDb {
    mem: Vec<i32>,
    mem_max: usize,
    max_mem_max: usize,
    growth_factor: f64,
    /// High-water mark separating irredundant clauses (loaded from the input formula, indices
    /// below this) from redundant ones (learned during search, indices at or above this).
    pub mem_fixed: usize,
    /// Number of learned clauses currently in the arena.
    pub lemma_count: u64,
    /// Budget of learned clauses before [`reduceDB`][crate::clause::reduce::reduce_db] is due.
    /// Grows whenever it is exceeded, so that reductions become less frequent over time.
    pub max_lemmas: u64,
}

impl ClauseDb {
    pub fn new(
        initial_mem_max: usize,
        max_mem_max: usize,
        growth_factor: f64,
        initial_max_lemmas: u64,
    ) -> ClauseDb {
        let mut mem = Vec::with_capacity(initial_mem_max.max(LINK_CELLS + 1));
        // Reserve cell 0 so a real clause never starts there.
        mem.push(0);
        ClauseDb {
            mem,
            mem_max: initial_mem_max,
            max_mem_max,
            growth_factor,
            mem_fixed: 1,
            lemma_count: 0,
            max_lemmas: initial_max_lemmas,
        }
    }

    /// Number of cells currently used in the arena.
    pub fn mem_used(&self) -> usize {
        self.mem.len()
    }

    /// Current arena capacity before another growth step is required.
    pub fn mem_max(&self) -> usize {
        self.mem_max
    }

    /// Marks the current high-water mark as the boundary of the original (irredundant) formula.
    /// Called once after the initial formula has been fully loaded.
    pub fn fix(&mut self) {
        self.mem_fixed = self.mem.len();
    }

    fn ensure_capacity(&mut self, additional: usize) -> Result<(), SolverError> {
        let needed = self.mem.len() + additional;
        if needed > self.mem_max {
            let mut new_max = self.mem_max;
            while new_max < needed {
                new_max = ((new_max as f64) * self.growth_factor) as usize + additional;
            }
            if new_max > self.max_mem_max {
                return Err(SolverError::OutOfMemory {
                    limit: self.max_mem_max,
                });
            }
            self.mem_max = new_max;
        }
        Ok(())
    }

    /// Appends a clause to the arena and returns its reference.
    ///
    /// The caller is responsible for threading the returned reference onto the watch lists of
    /// `lits[0]` and `lits[1]` when `lits.len() > 1` (see [`crate::prop::watch`]).
    pub fn add_clause(&mut self, lits: &[Lit], redundant: bool) -> Result<ClauseRef, SolverError> {
        let base = self.mem.len();
        self.ensure_capacity(LINK_CELLS + lits.len() + 1)?;
        self.mem.push(ClauseRef::END.0);
        self.mem.push(ClauseRef::END.0);
        for &lit in lits {
            self.mem.push(lit.raw());
        }
        self.mem.push(0);
        if redundant {
            self.lemma_count += 1;
        }
        Ok(ClauseRef(base as i32))
    }

    /// Returns the literals of the clause at `cref`.
    pub fn lits(&self, cref: ClauseRef) -> &[Lit] {
        let start = cref.index() + LINK_CELLS;
        let mut end = start;
        while self.mem[end] != 0 {
            end += 1;
        }
        // Safety-free: `Lit` and `i32` share layout (`Lit` is `#[repr(transparent)]`-equivalent
        // over `LitIdx = i32`); `from_raw` is used instead of a transmute to stay honest about it.
        unsafe { std::slice::from_raw_parts(self.mem[start..end].as_ptr() as *const Lit, end - start) }
    }

    /// Returns the literals of the clause at `cref`, mutable.
    pub fn lits_mut(&mut self, cref: ClauseRef) -> &mut [Lit] {
        let start = cref.index() + LINK_CELLS;
        let mut end = start;
        while self.mem[end] != 0 {
            end += 1;
        }
        unsafe {
            std::slice::from_raw_parts_mut(self.mem[start..end].as_mut_ptr() as *mut Lit, end - start)
        }
    }

    /// Size (number of literals) of the clause at `cref`.
    pub fn size(&self, cref: ClauseRef) -> usize {
        self.lits(cref).len()
    }

    /// Reads one of a clause's two link cells (`which` is 0 or 1).
    pub fn link(&self, cref: ClauseRef, which: usize) -> ClauseRef {
        ClauseRef(self.mem[cref.index() + which])
    }

    /// Writes one of a clause's two link cells (`which` is 0 or 1).
    pub fn set_link(&mut self, cref: ClauseRef, which: usize, next: ClauseRef) {
        self.mem[cref.index() + which] = next.0;
    }

    /// Whether `cref` refers to a clause at or beyond the redundant boundary.
    pub fn is_redundant(&self, cref: ClauseRef) -> bool {
        cref.index() >= self.mem_fixed
    }

    /// Compacts the redundant (learned) region of the arena in place, keeping only clauses for
    /// which `keep` returns true, and returns the `(old, new)` reference pairs for every clause
    /// kept (in arena order), so the caller can re-register their watches.
    ///
    /// Clauses below `mem_fixed` are untouched.
    pub fn reduce_redundant<F>(&mut self, keep: F) -> Vec<(ClauseRef, ClauseRef)>
    where
        F: Fn(&[Lit]) -> bool,
    {
        let old_len = self.mem.len();
        let boundary = self.mem_fixed;
        let mut write = boundary;
        let mut read = boundary;
        let mut remapped = Vec::new();
        let mut new_lemma_count = 0u64;
        while read < old_len {
            let cref = ClauseRef(read as i32);
            let size = self.size(cref);
            let clause_len = LINK_CELLS + size + 1;
            if keep(self.lits(cref)) {
                if write != read {
                    for k in 0..clause_len {
                        self.mem[write + k] = self.mem[read + k];
                    }
                }
                remapped.push((cref, ClauseRef(write as i32)));
                new_lemma_count += 1;
                write += clause_len;
            }
            read += clause_len;
        }
        self.mem.truncate(write);
        self.lemma_count = new_lemma_count;
        remapped
    }

    /// Iterates over every clause currently stored at or beyond `from`, in arena order.
    ///
    /// Used by [`crate::clause::reduce::reduce_db`] to walk the learned-clause region.
    pub fn iter_from(&self, from: usize) -> ClauseIter<'_> {
        ClauseIter {
            db: self,
            pos: from,
        }
    }
}

/// Forward iterator over clauses stored starting at a given arena offset.
pub struct ClauseIter<'a> {
    db: &'a ClauseDb,
    pos: usize,
}

impl<'a> Iterator for ClauseIter<'a> {
    type Item = ClauseRef;

    fn next(&mut self) -> Option<ClauseRef> {
        if self.pos >= self.db.mem.len() {
            return None;
        }
        let cref = ClauseRef(self.pos as i32);
        let size = self.db.size(cref);
        self.pos += LINK_CELLS + size + 1;
        Some(cref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(db: &mut ClauseDb, lits: &[isize], redundant: bool) -> ClauseRef {
        let lits: Vec<Lit> = lits.iter().map(|&l| Lit::from_dimacs(l)).collect();
        db.add_clause(&lits, redundant).unwrap()
    }

    #[test]
    fn added_clauses_read_back_their_literals() {
        let mut db = ClauseDb::new(64, 1 << 20, 1.5, 300);
        let a = clause(&mut db, &[1, -2, 3], false);
        let b = clause(&mut db, &[-1, 2], false);
        assert_eq!(
            db.lits(a).iter().map(|l| l.to_dimacs()).collect::<Vec<_>>(),
            vec![1, -2, 3]
        );
        assert_eq!(
            db.lits(b).iter().map(|l| l.to_dimacs()).collect::<Vec<_>>(),
            vec![-1, 2]
        );
    }

    #[test]
    fn arena_grows_past_its_initial_capacity_without_losing_clauses() {
        let mut db = ClauseDb::new(4, 1 << 20, 1.5, 300);
        let mut refs = Vec::new();
        for i in 0..200isize {
            refs.push(clause(&mut db, &[i + 1, -(i + 2)], false));
        }
        assert!(db.mem_max() > 4);
        for (i, &cref) in refs.iter().enumerate() {
            let i = i as isize;
            assert_eq!(
                db.lits(cref).iter().map(|l| l.to_dimacs()).collect::<Vec<_>>(),
                vec![i + 1, -(i + 2)]
            );
        }
    }

    #[test]
    fn out_of_memory_is_reported_once_the_hard_cap_is_exceeded() {
        let mut db = ClauseDb::new(4, 8, 1.5, 300);
        for i in 0..10isize {
            if clause_checked(&mut db, &[i + 1, -(i + 2)]).is_err() {
                return;
            }
        }
        panic!("expected an out-of-memory error before 10 clauses fit in 8 cells");
    }

    fn clause_checked(db: &mut ClauseDb, lits: &[isize]) -> Result<ClauseRef, SolverError> {
        let lits: Vec<Lit> = lits.iter().map(|&l| Lit::from_dimacs(l)).collect();
        db.add_clause(&lits, false)
    }

    #[test]
    fn reduce_redundant_keeps_only_clauses_the_predicate_accepts_and_preserves_order() {
        let mut db = ClauseDb::new(64, 1 << 20, 1.5, 300);
        clause(&mut db, &[1, 2], false);
        db.fix();

        let kept_a = clause(&mut db, &[1, -2], true);
        let _dropped = clause(&mut db, &[-1, 2], true);
        let kept_b = clause(&mut db, &[3, 4], true);
        assert_eq!(db.lemma_count, 3);

        let keep_unless_negative_one = |lits: &[Lit]| !lits.iter().any(|l| l.to_dimacs() == -1);
        let remapped = db.reduce_redundant(keep_unless_negative_one);

        assert_eq!(db.lemma_count, 2);
        let kept_old: Vec<ClauseRef> = remapped.iter().map(|&(old, _)| old).collect();
        assert_eq!(kept_old, vec![kept_a, kept_b]);

        for (_, new_ref) in &remapped {
            assert!(db
                .lits(*new_ref)
                .iter()
                .any(|l| l.to_dimacs() == 1 || l.to_dimacs() == 3));
        }
    }

    #[test]
    fn reduce_redundant_never_touches_clauses_below_the_fixed_boundary() {
        let mut db = ClauseDb::new(64, 1 << 20, 1.5, 300);
        let irredundant = clause(&mut db, &[5, 6], false);
        db.fix();
        clause(&mut db, &[1, 2], true);

        db.reduce_redundant(|_| false);

        assert_eq!(
            db.lits(irredundant).iter().map(|l| l.to_dimacs()).collect::<Vec<_>>(),
            vec![5, 6]
        );
        assert_eq!(db.lemma_count, 0);
    }
}
