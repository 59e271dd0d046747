//! Two-watched-literal unit propagation.

use crate::clause::db::ClauseDb;
use crate::clause::ClauseRef;
use crate::prop::assignment::Assignment;
use crate::prop::watch::Watchlists;
use crate::stats::Stats;

/// Propagates every consequence of the literals already on the trail, stopping at the first
/// conflict.
///
/// Returns the conflicting clause, or `None` once the trail is fully processed without a
/// conflict.
pub fn propagate(
    db: &mut ClauseDb,
    watches: &mut Watchlists,
    assignment: &mut Assignment,
    stats: &mut Stats,
) -> Option<ClauseRef> {
    while let Some(lit) = assignment.next_to_propagate() {
        let false_lit = !lit;
        let mut cur = watches.head(false_lit);
        let mut prev_link: Option<(ClauseRef, usize)> = None;

        while cur != ClauseRef::END {
            let slot = Watchlists::link_slot(db, cur, false_lit);
            let next = db.link(cur, slot);

            let (other, size) = {
                let lits = db.lits(cur);
                (lits[1 - slot], lits.len())
            };

            if assignment.is_true(other) {
                // Clause already satisfied by its other watched literal; keep the watch.
                prev_link = Some((cur, slot));
                cur = next;
                continue;
            }

            let replacement = {
                let lits = db.lits(cur);
                (2..size).find(|&i| !assignment.is_false(lits[i]))
            };

            if let Some(i) = replacement {
                let new_watch_lit = {
                    let lits = db.lits_mut(cur);
                    lits.swap(slot, i);
                    lits[slot]
                };
                match prev_link {
                    Some((p, pslot)) => db.set_link(p, pslot, next),
                    None => watches.set_head(false_lit, next),
                }
                watches.watch(db, new_watch_lit, cur);
                cur = next;
            } else if assignment.is_false(other) {
                return Some(cur);
            } else {
                assignment.assign(other, cur);
                stats.propagations += 1;
                prev_link = Some((cur, slot));
                cur = next;
            }
        }
    }
    None
}
