//! The main conflict-driven search loop tying propagation, conflict analysis, restarts and
//! database reduction together.

use crate::analyze::{analyze, analyze_final};
use crate::clause::reduce::reduce_db;
use crate::clause::ClauseRef;
use crate::context::Context;
use crate::decision::next_decision;
use crate::error::SolverError;
use crate::incremental::{enqueue_assumption, EnqueueAssumption};
use crate::prop::propagate::propagate;
use crate::state::SatState;

/// Outcome of a (possibly conflict-bounded) call to [`solve`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SolveResult {
    Sat,
    Unsat,
    Unknown,
}

/// Runs unit propagation, conflict analysis, restarts and decisions until the formula (under the
/// current assumptions) is decided, or until `conflict_limit` conflicts have been spent.
///
/// A negative `conflict_limit` means unbounded: the budget check never fires and the loop only
/// stops once the formula is decided.
pub fn solve(ctx: &mut Context, conflict_limit: i64) -> Result<SolveResult, SolverError> {
    match ctx.state.sat_state {
        SatState::Sat => return Ok(SolveResult::Sat),
        SatState::Unsat | SatState::UnsatUnderAssumptions => return Ok(SolveResult::Unsat),
        SatState::Unknown => {}
    }

    ctx.schedule.reset();
    ctx.assignment.take_disagreements();

    let mut remaining = conflict_limit;

    // Whether the trail segment about to be handed to `propagate` was produced by a root-level
    // derivation rather than a decision: initially true to drain whatever units were loaded
    // before the first `solve` call, and set again whenever conflict analysis learns a clause
    // that collapses all the way back to the root.
    let mut forced = true;

    loop {
        let before = ctx.assignment.len();
        let conflict = propagate(
            &mut ctx.clause_db,
            &mut ctx.watches,
            &mut ctx.assignment,
            &mut ctx.stats,
        );
        ctx.schedule
            .record_assigned((ctx.assignment.len() - before) as u64);
        ctx.schedule
            .record_disagreements(ctx.assignment.take_disagreements());

        match conflict {
            Some(conflict_ref) => {
                if forced {
                    ctx.state.sat_state = SatState::Unsat;
                    return Ok(SolveResult::Unsat);
                }

                ctx.stats.conflicts += 1;
                let restart_due = ctx.schedule.record_conflict();

                let analysis = analyze(&ctx.clause_db, &mut ctx.assignment, &mut ctx.vmtf, conflict_ref);
                ctx.assignment.backtrack_to(analysis.backjump_to);

                let unit = analysis.learned.len() == 1;
                let cref = ctx.clause_db.add_clause(&analysis.learned, true)?;
                if analysis.learned.len() >= 2 {
                    let (l0, l1) = {
                        let lits = ctx.clause_db.lits(cref);
                        (lits[0], lits[1])
                    };
                    ctx.watches.watch(&mut ctx.clause_db, l0, cref);
                    ctx.watches.watch(&mut ctx.clause_db, l1, cref);
                }
                ctx.assignment.assign(analysis.learned[0], cref);
                ctx.schedule.record_assigned(1);
                ctx.schedule
                    .record_disagreements(ctx.assignment.take_disagreements());

                forced = unit;
                if forced {
                    ctx.assignment.fix_root_level();
                }

                sync_stats(ctx);

                if conflict_limit >= 0 {
                    remaining -= 1;
                    if remaining < 0 {
                        restart(ctx);
                        reduce_db(
                            &mut ctx.clause_db,
                            &mut ctx.watches,
                            &ctx.assignment,
                            ctx.config.lemma_budget_growth,
                            ctx.config.reduce_threshold_on_limit,
                        );
                        ctx.stats.reduce_db_calls += 1;
                        sync_stats(ctx);
                        return Ok(SolveResult::Unknown);
                    }
                }

                // An exceeded lemma budget must always restart to the root level in the same
                // iteration it gets reduced: `reduce_db` below can relocate or drop any learned
                // clause, and a clause still serving as some assigned variable's reason would be
                // corrupted by that. Restarting first guarantees nothing above the root is
                // assigned when `reduce_db` runs.
                let lemma_budget_exceeded = ctx.clause_db.lemma_count > ctx.clause_db.max_lemmas;

                if restart_due || lemma_budget_exceeded {
                    restart(ctx);
                    forced = false;
                }

                if lemma_budget_exceeded {
                    reduce_db(
                        &mut ctx.clause_db,
                        &mut ctx.watches,
                        &ctx.assignment,
                        ctx.config.lemma_budget_growth,
                        ctx.config.reduce_threshold_on_budget,
                    );
                    ctx.stats.reduce_db_calls += 1;
                    sync_stats(ctx);
                }
            }
            None => {
                if forced {
                    ctx.assignment.fix_root_level();
                }
                forced = false;

                match enqueue_assumption(ctx) {
                    EnqueueAssumption::Enqueued => continue,
                    EnqueueAssumption::Conflict(lit) => {
                        let core = analyze_final(&ctx.clause_db, &mut ctx.assignment, lit);
                        ctx.failed_core = core;
                        ctx.state.sat_state = SatState::UnsatUnderAssumptions;
                        return Ok(SolveResult::Unsat);
                    }
                    EnqueueAssumption::Done => {}
                }

                match next_decision(&ctx.vmtf, &ctx.assignment) {
                    Some(lit) => {
                        ctx.assignment.assign(lit, ClauseRef::NO_REASON);
                        ctx.schedule.record_assigned(1);
                        ctx.schedule
                            .record_disagreements(ctx.assignment.take_disagreements());
                        ctx.stats.decisions += 1;
                    }
                    None => {
                        ctx.state.sat_state = SatState::Sat;
                        return Ok(SolveResult::Sat);
                    }
                }
            }
        }
    }
}

/// Unassigns everything above the root level, preserving the saved model (phases) and the VMTF
/// order, neither of which a restart touches.
fn restart(ctx: &mut Context) {
    let root = ctx.assignment.root_level();
    ctx.assignment.backtrack_to(root);
    ctx.schedule.reset();
    ctx.stats.restarts += 1;
}

fn sync_stats(ctx: &mut Context) {
    ctx.stats.mem_used = ctx.clause_db.mem_used();
    ctx.stats.max_lemmas = ctx.clause_db.max_lemmas;
    ctx.stats.learned_clauses = ctx.clause_db.lemma_count;
}

#[cfg(test)]
mod tests {
    use super::*;

    use tinycdcl_formula::{cnf_formula, CnfFormula, ExtendFormula, Lit};

    use crate::config::SolverConfig;
    use crate::load::{add_clause, finish_loading};

    fn load(formula: &CnfFormula) -> Context {
        let mut ctx = Context::new(SolverConfig::default(), formula.var_count());
        for clause in formula.iter() {
            add_clause(&mut ctx, clause).unwrap();
        }
        finish_loading(&mut ctx);
        ctx
    }

    #[test]
    fn root_level_conflict_is_unsat() {
        let formula = cnf_formula![
            1;
            -1;
        ];
        let mut ctx = load(&formula);
        assert_eq!(solve(&mut ctx, -1).unwrap(), SolveResult::Unsat);
    }

    #[test]
    fn simple_satisfiable() {
        let formula = cnf_formula![
            1, 2;
            -1, 2;
            1, -2;
        ];
        let mut ctx = load(&formula);
        assert_eq!(solve(&mut ctx, -1).unwrap(), SolveResult::Sat);
        for clause in formula.iter() {
            assert!(clause
                .iter()
                .any(|&lit| ctx.assignment.is_true(lit)));
        }
    }

    #[test]
    fn forced_units_rule_out_the_only_model() {
        // Both pigeons forced into the single hole, but the hole can only hold one.
        let formula = cnf_formula![
            1;
            2;
            -1, -2;
        ];
        let mut ctx = load(&formula);
        assert_eq!(solve(&mut ctx, -1).unwrap(), SolveResult::Unsat);
    }

    #[test]
    fn lemma_budget_reduction_always_restarts_first() {
        // A budget of zero lemmas means the very first learned clause already exceeds it, so
        // `reduce_db` fires on every conflict. If it ever ran without restarting to the root
        // level first, a learned clause still serving as some assigned variable's reason could
        // be dropped or relocated out from under it, corrupting the search.
        let mut config = SolverConfig::default();
        config.initial_max_lemmas = 0;

        // No unit clauses: the first conflict only arises after a decision, so it goes through
        // `analyze` (rather than being caught by root-level propagation alone) and actually
        // learns a clause, which is what exercises the budget-triggered reduction path below.
        let formula = cnf_formula![
            1, 2;
            1, -2;
            -1, 2;
            -1, -2;
        ];

        let mut ctx = Context::new(config, formula.var_count());
        for clause in formula.iter() {
            add_clause(&mut ctx, clause).unwrap();
        }
        finish_loading(&mut ctx);

        let result = solve(&mut ctx, -1).unwrap();
        assert_eq!(result, SolveResult::Unsat);
        assert!(ctx.stats.reduce_db_calls > 0);
        assert!(ctx.stats.restarts >= ctx.stats.reduce_db_calls);
    }

    #[test]
    fn conflict_limit_returns_unknown() {
        let mut formula = CnfFormula::new();
        // A small chain that requires at least a few conflicts to resolve, to make the budget
        // of zero conflicts bite before a verdict is reached.
        for i in 1..6isize {
            formula.add_clause(&[Lit::from_dimacs(i), Lit::from_dimacs(-(i + 1))]);
            formula.add_clause(&[Lit::from_dimacs(-i), Lit::from_dimacs(i + 1)]);
        }
        formula.add_clause(&[Lit::from_dimacs(1)]);
        formula.add_clause(&[Lit::from_dimacs(-6)]);
        let mut ctx = load(&formula);
        let result = solve(&mut ctx, 0).unwrap();
        assert!(result == SolveResult::Unknown || result == SolveResult::Unsat);
    }
}
