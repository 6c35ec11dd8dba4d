//! # diffadapt
//!
//! Rewrites freely-reflowed revisions of a document (for example the
//! output of a machine copy-edit) so that their line structure follows
//! the original document as closely as the underlying edit allows.
//!
//! Version control and human reviewers diff documents line by line; a
//! semantically small edit that reflows five lines into one paragraph
//! buries the sentences that actually changed. Re-breaking the revision
//! along the original's line boundaries keeps the diff about the words.
//!
//! The engine is pure text-in/text-out: no I/O, no configuration, no
//! grammar knowledge. It aligns token sequences, tracks a running debt of
//! newlines owed to the output, and pays that debt back at lexically
//! plausible break points.
//!
//! ```
//! use diffadapt::diffadapt;
//!
//! let orig = "Jupiter big.\nJupiter a planet.\nJupiter gas.\n";
//! let revised = "Jupiter is a big planet made of gas.";
//! let adapted = diffadapt(orig, &[revised]);
//! assert_eq!(adapted[0], "Jupiter is\na big planet\nmade of gas.\n");
//! ```

pub mod adapting;
pub mod matching;
pub mod tokens;

pub use adapting::{
    adapt_revision, ensure_trailing_newline, operation_trace, AdaptedRevision, DebtDecay,
};
pub use matching::{OpTag, Operation, TokenSequenceMatcher};
pub use tokens::{detokenize, tokenize, tokenize_with_sentinel, Token};

/// Adapt every revision of `orig_text`, using the default debt-decay
/// policy.
///
/// Each revision is terminated with a newline if it lacked one, aligned
/// against the original's cached token sequence, and re-broken along the
/// original's line structure. Revisions are processed independently; the
/// output has the same length and order as `revisions`.
pub fn diffadapt<S: AsRef<str>>(orig_text: &str, revisions: &[S]) -> Vec<String> {
    diffadapt_with(orig_text, revisions, DebtDecay::default())
}

/// Like [`diffadapt`], with an explicit debt-decay policy.
pub fn diffadapt_with<S: AsRef<str>>(
    orig_text: &str,
    revisions: &[S],
    decay: DebtDecay,
) -> Vec<String> {
    let matcher = TokenSequenceMatcher::new(orig_text);
    revisions
        .iter()
        .map(|rev| adapt_revision(&matcher, rev.as_ref(), decay))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Whatever\n", "", "\n")]
    #[case("Hello\n", "World", "World\n")]
    #[case("Hello\n", "World\n", "World\n")]
    fn test_trivial_adaptations(#[case] orig: &str, #[case] revised: &str, #[case] expected: &str) {
        assert_eq!(diffadapt(orig, &[revised]), vec![expected.to_string()]);
    }

    #[test]
    fn test_no_revisions() {
        assert_eq!(diffadapt("Some text\n", &[] as &[&str]), Vec::<String>::new());
    }

    #[test]
    fn test_empty_original() {
        assert_eq!(diffadapt("", &["brand new"]), vec!["brand new\n"]);
        assert_eq!(diffadapt("", &[""]), vec!["\n"]);
    }

    #[test]
    fn test_unchanged_revision_reproduces_original() {
        let orig = "First line.\n\n    Indented second.\nThird line.\n";
        assert_eq!(diffadapt(orig, &[orig]), vec![orig.to_string()]);
    }

    #[test]
    fn test_reflowed_lines_are_rebroken() {
        let orig = "Jupiter big.\nJupiter a planet.\nJupiter gas.\n";
        let revised = "Jupiter is a big planet made of gas.";

        let adapted = diffadapt(orig, &[revised]);
        assert_eq!(adapted, vec!["Jupiter is\na big planet\nmade of gas.\n"]);
    }

    #[test]
    fn test_revisions_are_independent() {
        let orig = "Jupiter big.\nJupiter a planet.\nJupiter gas.\n";
        let r1 = "Jupiter is a big planet made of gas.";
        let r2 = "Jupiter gas.\n";

        let batch = diffadapt(orig, &[r1, r2]);
        assert_eq!(
            batch,
            vec![diffadapt(orig, &[r1])[0].clone(), diffadapt(orig, &[r2])[0].clone()]
        );
    }

    #[test]
    fn test_matcher_is_reused_across_revisions() {
        let orig = "Shared original.\n";
        let adapted = diffadapt(orig, &["First revision.", "Second revision."]);

        assert_eq!(adapted.len(), 2);
        assert!(adapted.iter().all(|text| text.ends_with('\n')));
    }
}
