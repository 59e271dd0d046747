//! Black-box DIMACS CNF round-tripping tests.

use std::fs::File;
use std::io::{Seek, SeekFrom};

use tempfile::NamedTempFile;

use tinycdcl_dimacs::{write_dimacs, DimacsParser};
use tinycdcl_formula::{CnfFormula, ExtendFormula, Lit};

#[test]
fn formula_survives_a_write_then_parse_roundtrip() {
    let mut formula = CnfFormula::new();
    formula.add_clause(&[Lit::from_dimacs(1), Lit::from_dimacs(2), Lit::from_dimacs(3)]);
    formula.add_clause(&[Lit::from_dimacs(-1), Lit::from_dimacs(-2)]);
    formula.add_clause(&[Lit::from_dimacs(3)]);

    let mut buffer = Vec::new();
    write_dimacs(&mut buffer, &formula).unwrap();

    let parsed = DimacsParser::parse(&buffer[..]).unwrap();
    assert_eq!(parsed, formula);
}

#[test]
fn comments_and_header_are_accepted() {
    let input = b"\
c a short comment
c another one
p cnf 3 2
1 -2 3 0
-1 2 0
";
    let formula = DimacsParser::parse(&input[..]).unwrap();
    assert_eq!(formula.var_count(), 3);
    assert_eq!(formula.len(), 2);
}

#[test]
fn header_clause_count_mismatch_is_an_error() {
    let input = b"p cnf 2 5\n1 2 0\n";
    assert!(DimacsParser::parse(&input[..]).is_err());
}

#[test]
fn empty_formula_roundtrips() {
    let formula = CnfFormula::new();
    let mut buffer = Vec::new();
    write_dimacs(&mut buffer, &formula).unwrap();
    let parsed = DimacsParser::parse(&buffer[..]).unwrap();
    assert_eq!(parsed, formula);
}

#[test]
fn parses_from_a_real_file_not_just_an_in_memory_buffer() {
    let mut formula = CnfFormula::new();
    formula.add_clause(&[Lit::from_dimacs(1), Lit::from_dimacs(-2)]);
    formula.add_clause(&[Lit::from_dimacs(2), Lit::from_dimacs(3)]);

    let mut temp = NamedTempFile::new().expect("failed to create temp file");
    write_dimacs(temp.as_file_mut(), &formula).unwrap();
    temp.as_file_mut().sync_all().unwrap();

    let mut reopened = File::open(temp.path()).expect("failed to reopen temp file");
    reopened.seek(SeekFrom::Start(0)).unwrap();
    let parsed = DimacsParser::parse(reopened).unwrap();

    assert_eq!(parsed, formula);
}
