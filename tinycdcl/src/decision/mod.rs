//! Decision heuristic: which variable to branch on next, and with which polarity.

pub mod vmtf;

use tinycdcl_formula::Lit;

use crate::prop::assignment::Assignment;

/// Picks the next decision literal, or `None` if every variable is already assigned.
///
/// The polarity is the variable's saved phase from its last assignment (or `false` if it has
/// never been assigned), so that restarts resume exploring the same region of the search space
/// rather than starting over from a fixed default polarity.
pub fn next_decision(vmtf: &vmtf::Vmtf, assignment: &Assignment) -> Option<Lit> {
    vmtf.next_unassigned(assignment)
        .map(|var| var.lit(assignment.saved_phase(var)))
}
