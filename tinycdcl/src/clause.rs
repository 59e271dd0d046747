//! Clause representation and the flat clause-database arena.
//!
//! Clauses live in a single append-only `Vec<i32>` arena instead of being individually heap
//! allocated. A [`ClauseRef`] is the index of a clause's first cell in that arena, so growing the
//! arena (which may require reallocating the backing `Vec`) never invalidates an existing
//! reference the way the original solver's raw pointers needed rebasing after a `realloc`.
//!
//! Each clause occupies `size + 3` cells:
//!
//! ```text
//! [ link0 | link1 | lit_0 | lit_1 | ... | lit_{size-1} | 0 ]
//! ```
//!
//! `link0` and `link1` thread the clause onto the watch lists of its first two literals (see
//! [`crate::prop::watch`]); they are unused (but still reserved, to keep clause layout uniform)
//! for unit clauses, which are never watched. The trailing zero terminates the literal run so a
//! clause's size never needs to be stored separately.

pub mod db;
pub mod reduce;

/// A reference to a clause stored in the [`db::ClauseDb`] arena.
///
/// This is an index into the arena, not a pointer: it stays valid across arena growth.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ClauseRef(pub i32);

impl ClauseRef {
    /// Sentinel marking the end of a watch list.
    pub const END: ClauseRef = ClauseRef(-9);

    /// Sentinel used in the `reason` array for literals that were decided or assumed rather than
    /// propagated, i.e. that have no reason clause.
    pub const NO_REASON: ClauseRef = ClauseRef(0);

    /// Index of this clause's first link cell in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
