//! Case-corpus tests for whole-text adaptation
//!
//! Each case directory holds an original document, a revision as a model
//! would return it, and the expected adapted output. Cases under `undo/`
//! are expected to reproduce the original exactly.

use diffadapt::diffadapt;
use std::fs;
use std::path::{Path, PathBuf};

fn cases_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/cases")
}

fn read_case_file(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name))
        .unwrap_or_else(|err| panic!("missing {} in {}: {}", name, dir.display(), err))
}

#[test]
fn diff_cases() {
    let mut cases = 0;
    for entry in fs::read_dir(cases_root().join("diff")).expect("diff case directory") {
        let dir = entry.expect("case entry").path();
        let orig = read_case_file(&dir, "orig.txt");
        let revised = read_case_file(&dir, "revised.txt");
        let expected = read_case_file(&dir, "expected.txt");

        let got = diffadapt(&orig, &[revised]);
        assert_eq!(got[0], expected, "case {}", dir.display());
        cases += 1;
    }
    assert!(cases > 0, "no diff cases found");
}

#[test]
fn undo_cases() {
    let mut cases = 0;
    for entry in fs::read_dir(cases_root().join("undo")).expect("undo case directory") {
        let dir = entry.expect("case entry").path();
        let orig = read_case_file(&dir, "orig.txt");
        let revised = read_case_file(&dir, "revised.txt");

        let got = diffadapt(&orig, &[revised]);
        assert_eq!(got[0], orig, "case {}", dir.display());
        cases += 1;
    }
    assert!(cases > 0, "no undo cases found");
}
