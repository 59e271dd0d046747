//! Periodic reduction of the learned-clause region of the clause database.

use crate::clause::db::ClauseDb;
use crate::clause::ClauseRef;
use crate::prop::assignment::Assignment;
use crate::prop::watch::Watchlists;

/// Drops learned clauses that are not worth keeping and compacts the rest.
///
/// A learned clause survives if *fewer than* `threshold` of its literals agree with the current
/// saved phase (i.e. would be satisfied if the search resumed from the last known model). A
/// clause easily satisfied by the saved model carries little information about the search space
/// still being explored and is safe to drop; a clause only barely satisfied (or not at all) is
/// still doing useful work and is kept. This is used as a proxy for relevance since actual clause
/// activity is not tracked.
///
/// Before compacting, every watch-list entry pointing into the learned-clause region is dropped;
/// surviving clauses are re-watched on their (possibly relocated) first two literals afterward.
pub fn reduce_db(
    db: &mut ClauseDb,
    watches: &mut Watchlists,
    assignment: &Assignment,
    lemma_budget_growth: u64,
    threshold: usize,
) {
    while db.lemma_count > db.max_lemmas {
        db.max_lemmas += lemma_budget_growth;
    }

    let boundary = db.mem_fixed;
    watches.purge_redundant(db, boundary);

    let remapped = db.reduce_redundant(|lits| {
        lits.iter()
            .filter(|&&lit| assignment.saved_phase(lit.var()) == lit.is_positive())
            .count()
            < threshold
    });

    for (_, new_ref) in remapped {
        rewatch_if_binary_or_longer(db, watches, new_ref);
    }
}

fn rewatch_if_binary_or_longer(db: &mut ClauseDb, watches: &mut Watchlists, cref: ClauseRef) {
    if db.size(cref) < 2 {
        return;
    }
    let (l0, l1) = {
        let lits = db.lits(cref);
        (lits[0], lits[1])
    };
    watches.watch(db, l0, cref);
    watches.watch(db, l1, cref);
}

#[cfg(test)]
mod tests {
    use super::*;

    use tinycdcl_formula::Lit;

    fn assert_watch_chain(db: &ClauseDb, watches: &Watchlists, lit: Lit, expected: &[ClauseRef]) {
        let mut seen = Vec::new();
        let mut cur = watches.head(lit);
        while cur != ClauseRef::END {
            seen.push(cur);
            let slot = Watchlists::link_slot(db, cur, lit);
            cur = db.link(cur, slot);
        }
        assert_eq!(seen, expected);
    }

    #[test]
    fn reduce_db_drops_phase_satisfied_lemmas_and_rewatches_survivors() {
        let mut db = ClauseDb::new(64, 1 << 20, 1.5, 300);
        let mut watches = Watchlists::new(8);
        let mut assignment = Assignment::new(8);

        let irredundant = db.add_clause(&[Lit::from_dimacs(7), Lit::from_dimacs(8)], false).unwrap();
        watches.watch(&mut db, Lit::from_dimacs(7), irredundant);
        watches.watch(&mut db, Lit::from_dimacs(8), irredundant);
        db.fix();

        // Fully satisfied by the saved phase (var 1 = true, var 2 = true): dropped at
        // threshold = 2.
        let dropped = db.add_clause(&[Lit::from_dimacs(1), Lit::from_dimacs(2)], true).unwrap();
        watches.watch(&mut db, Lit::from_dimacs(1), dropped);
        watches.watch(&mut db, Lit::from_dimacs(2), dropped);

        // Not satisfied by the saved phase at all: kept.
        let kept = db.add_clause(&[Lit::from_dimacs(-1), Lit::from_dimacs(-2)], true).unwrap();
        watches.watch(&mut db, Lit::from_dimacs(-1), kept);
        watches.watch(&mut db, Lit::from_dimacs(-2), kept);

        assignment.set_saved_phase(Lit::from_dimacs(1).var(), true);
        assignment.set_saved_phase(Lit::from_dimacs(2).var(), true);

        assert_eq!(db.lemma_count, 2);
        reduce_db(&mut db, &mut watches, &assignment, 300, 2);
        assert_eq!(db.lemma_count, 1);

        // The irredundant clause's watches must survive reduceDB untouched.
        assert_watch_chain(&db, &watches, Lit::from_dimacs(7), &[irredundant]);
        assert_watch_chain(&db, &watches, Lit::from_dimacs(8), &[irredundant]);

        // The surviving lemma was relocated (its old reference is now stale); whatever clause
        // is now watched on its two literals must contain exactly its two original literals.
        let surviving_on_neg1 = watches.head(Lit::from_dimacs(-1));
        assert_ne!(surviving_on_neg1, ClauseRef::END);
        let mut lits: Vec<_> = db.lits(surviving_on_neg1).iter().map(|l| l.to_dimacs()).collect();
        lits.sort();
        assert_eq!(lits, vec![-2, -1]);
    }
}
