//! Black-box integration tests for the concrete seed scenarios and the cross-cutting testable
//! properties (model soundness, refutation soundness, assumption extraction, resumability,
//! determinism, arena-growth transparency).

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use tinycdcl::config::SolverConfig;
use tinycdcl::solver::{SolveResult, Solver};
use tinycdcl_dimacs::DimacsParser;
use tinycdcl_formula::{CnfFormula, ExtendFormula, Lit};

fn parse(dimacs: &str) -> tinycdcl_formula::CnfFormula {
    DimacsParser::parse(dimacs.as_bytes()).expect("valid DIMACS input")
}

fn assert_model_satisfies(formula: &tinycdcl_formula::CnfFormula, model: &[Lit]) {
    let model: HashSet<Lit> = model.iter().cloned().collect();
    for clause in formula.iter() {
        assert!(
            clause.iter().any(|lit| model.contains(lit)),
            "clause {:?} not satisfied by model",
            clause
        );
    }
}

#[test]
fn seed_1_single_positive_unit() {
    let formula = parse("p cnf 1 1\n1 0\n");
    let mut solver = Solver::new();
    solver.add_formula(&formula).unwrap();
    assert_eq!(solver.solve().unwrap(), SolveResult::Sat);
    assert_eq!(solver.get_model(tinycdcl_formula::Var::from_dimacs(1)), Some(true));
}

#[test]
fn seed_2_conflicting_units() {
    let formula = parse("p cnf 1 2\n1 0\n-1 0\n");
    let mut solver = Solver::new();
    solver.add_formula(&formula).unwrap();
    assert_eq!(solver.solve().unwrap(), SolveResult::Unsat);
}

#[test]
fn seed_3_small_satisfiable() {
    let formula = parse("p cnf 3 3\n1 2 0\n-1 3 0\n-2 -3 0\n");
    let mut solver = Solver::new();
    solver.add_formula(&formula).unwrap();
    assert_eq!(solver.solve().unwrap(), SolveResult::Sat);
    assert_model_satisfies(&formula, &solver.model().unwrap());
}

#[test]
fn seed_4_pigeonhole_php_3_2() {
    // Three pigeons (1, 2, 3), two holes (a = vars 1..2 for pigeon 1, etc.): pigeon p goes into
    // hole h iff var (p - 1) * 2 + h is true; at least one hole per pigeon, at most one pigeon
    // per hole.
    let dimacs = "\
p cnf 6 9
1 2 0
3 4 0
5 6 0
-1 -3 0
-1 -5 0
-3 -5 0
-2 -4 0
-2 -6 0
-4 -6 0
";
    let formula = parse(dimacs);
    let mut solver = Solver::new();
    solver.add_formula(&formula).unwrap();
    assert_eq!(solver.solve().unwrap(), SolveResult::Unsat);
}

#[test]
fn seed_5_assumption_final_conflict() {
    let formula = parse("p cnf 2 1\n1 2 0\n");
    let mut solver = Solver::new();
    solver.add_formula(&formula).unwrap();
    solver
        .assume(&[Lit::from_dimacs(-1), Lit::from_dimacs(-2)])
        .unwrap();
    assert_eq!(solver.solve().unwrap(), SolveResult::Unsat);

    let mut core: Vec<_> = solver.failed_core().unwrap().iter().map(|l| l.to_dimacs()).collect();
    core.sort();
    assert_eq!(core, vec![1, 2]);
}

#[test]
fn resumability_unknown_then_unbounded_agrees_with_monolithic_solve() {
    let mut formula = tinycdcl_formula::CnfFormula::new();
    for i in 1..40isize {
        formula.add_clause(&[Lit::from_dimacs(i), Lit::from_dimacs(-(i + 1))]);
        formula.add_clause(&[Lit::from_dimacs(-i), Lit::from_dimacs(i + 1)]);
    }
    formula.add_clause(&[Lit::from_dimacs(1)]);
    formula.add_clause(&[Lit::from_dimacs(-40)]);

    let mut incremental = Solver::new();
    incremental.add_formula(&formula).unwrap();
    let mut result = incremental.solve_limited(0).unwrap();
    let mut rounds = 0;
    while result == SolveResult::Unknown && rounds < 10_000 {
        result = incremental.solve_limited(1).unwrap();
        rounds += 1;
    }

    let mut monolithic = Solver::new();
    monolithic.add_formula(&formula).unwrap();
    let monolithic_result = monolithic.solve().unwrap();

    assert_eq!(result, monolithic_result);
    assert_eq!(result, SolveResult::Unsat);
}

#[test]
fn determinism_same_input_same_verdict_and_model() {
    let formula = parse(
        "p cnf 5 6\n1 2 3 0\n-1 2 0\n-2 3 4 0\n-3 -4 5 0\n-5 1 0\n2 -4 5 0\n",
    );

    let mut results = Vec::new();
    for _ in 0..5 {
        let mut solver = Solver::new();
        solver.add_formula(&formula).unwrap();
        let result = solver.solve().unwrap();
        let model = solver.model();
        let stats = solver.stats();
        results.push((result, model, stats.conflicts, stats.decisions));
    }

    for window in results.windows(2) {
        assert_eq!(window[0], window[1]);
    }
}

#[test]
fn arena_growth_is_transparent_to_the_verdict() {
    let mut formula = tinycdcl_formula::CnfFormula::new();
    for i in 1..25isize {
        formula.add_clause(&[Lit::from_dimacs(i), Lit::from_dimacs(-(i + 1)), Lit::from_dimacs(i + 2)]);
        formula.add_clause(&[Lit::from_dimacs(-i), Lit::from_dimacs(i + 1)]);
    }
    formula.add_clause(&[Lit::from_dimacs(1)]);

    let small_arena = SolverConfig {
        initial_mem_max: 16,
        ..SolverConfig::default()
    };
    let large_arena = SolverConfig {
        initial_mem_max: 1_000_000,
        ..SolverConfig::default()
    };

    let mut forced_to_grow = Solver::with_config(small_arena);
    forced_to_grow.add_formula(&formula).unwrap();
    let grown_result = forced_to_grow.solve().unwrap();
    let grown_model = forced_to_grow.model();

    let mut preallocated = Solver::with_config(large_arena);
    preallocated.add_formula(&formula).unwrap();
    let preallocated_result = preallocated.solve().unwrap();
    let preallocated_model = preallocated.model();

    assert_eq!(grown_result, preallocated_result);
    assert_eq!(grown_model, preallocated_model);
}

/// Draws a random 3-SAT formula at a fixed clause-to-variable ratio: each clause picks three
/// distinct variables uniformly at random and negates each independently.
fn random_3sat(rng: &mut StdRng, var_count: usize, clause_count: usize) -> CnfFormula {
    let mut formula = CnfFormula::new();
    let vars: Vec<usize> = (1..=var_count).collect();
    for _ in 0..clause_count {
        let mut chosen: Vec<usize> = vars.choose_multiple(rng, 3).cloned().collect();
        chosen.shuffle(rng);
        let clause: Vec<Lit> = chosen
            .into_iter()
            .map(|v| Lit::from_dimacs(if rng.gen::<bool>() { v as isize } else { -(v as isize) }))
            .collect();
        formula.add_clause(&clause);
    }
    formula
}

#[test]
fn seed_6_random_3sat_is_stable_across_runs_and_arena_regrowth() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0006);
    let formula = random_3sat(&mut rng, 50, 210);

    let mut verdicts = Vec::new();
    for _ in 0..5 {
        let mut solver = Solver::new();
        solver.add_formula(&formula).unwrap();
        verdicts.push(solver.solve().unwrap());
    }
    for window in verdicts.windows(2) {
        assert_eq!(window[0], window[1]);
    }

    let small_arena = SolverConfig {
        initial_mem_max: 32,
        ..SolverConfig::default()
    };
    let mut forced_to_grow = Solver::with_config(small_arena);
    forced_to_grow.add_formula(&formula).unwrap();
    let grown_result = forced_to_grow.solve().unwrap();

    assert_eq!(grown_result, verdicts[0]);
    if grown_result == SolveResult::Sat {
        assert_model_satisfies(&formula, &forced_to_grow.model().unwrap());
    }
}
