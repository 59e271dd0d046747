//! A compact CDCL (conflict-driven clause learning) Boolean satisfiability solver.
//!
//! This crate is the solving core: a flat clause-database arena, two-watched-literal unit
//! propagation, first-UIP conflict analysis with recursive self-subsumption, a variable
//! move-to-front (VMTF) decision heuristic with phase saving, a restart controller, periodic
//! database reduction, and assumption-based incremental solving with final-conflict extraction.
//!
//! Deliberately out of scope: proof emission, preprocessing/inprocessing, parallel search, and a
//! VSIDS activity heuristic (this solver uses VMTF by design, for minimal state and code). DIMACS
//! CNF parsing lives in [`tinycdcl_dimacs`]; the standalone command-line driver is a separate
//! binary crate.
//!
//! The [`Solver`](solver::Solver) struct is the crate's public entry point.

pub mod analyze;
pub mod cdcl;
pub mod clause;
pub mod config;
pub mod context;
pub mod decision;
pub mod error;
pub mod incremental;
pub mod load;
pub mod prop;
pub mod schedule;
pub mod solver;
pub mod state;
pub mod stats;

pub use solver::Solver;
pub use tinycdcl_formula::{CnfFormula, ExtendFormula, Lit, Var};
