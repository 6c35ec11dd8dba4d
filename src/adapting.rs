//! Rewrites an aligned revision so its line structure tracks the original
//!
//! A single left-to-right pass over the operations of one revision. The
//! only state is a signed count of newlines owed to the output (the line
//! debt) and the tokens emitted so far; every decision is local to the
//! current operation, with no backtracking or lookahead.
//!
//! Newlines that the original had inside edited spans are banked as debt,
//! then paid back at the next plausible break point in the revised text: a
//! newline the revision already has, a space following clause punctuation,
//! or the leading space of the next chunk.

use crate::matching::{OpTag, Operation, TokenSequenceMatcher};
use crate::tokens::{detokenize, Token};

/// Policy for decaying outstanding line debt when a reliable (multi-token)
/// equal match is seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DebtDecay {
    /// Drop the debt entirely
    #[default]
    Reset,
    /// Halve the debt, truncating toward zero
    Halve,
}

impl DebtDecay {
    fn apply(self, debt: i32) -> i32 {
        match self {
            DebtDecay::Reset => 0,
            DebtDecay::Halve => debt / 2,
        }
    }
}

/// Accumulates the adapted token stream for one revision.
pub struct AdaptedRevision {
    tokens: Vec<Token>,
    line_debt: i32,
    decay: DebtDecay,
}

impl AdaptedRevision {
    pub fn new(decay: DebtDecay) -> Self {
        Self {
            tokens: Vec::new(),
            line_debt: 0,
            decay,
        }
    }

    /// Apply one operation, emitting its share of the adapted stream.
    pub fn push_operation(&mut self, op: Operation) {
        if op.tag == OpTag::Equal {
            self.push_unrevised(op.revised);
        } else {
            self.line_debt += count_newlines(&op.original) as i32;
            if op.revised.is_empty() {
                self.undo_petty_deletion(op.original);
            } else {
                let inserted = op.original.is_empty();
                self.push_revised(op.revised, inserted);
            }
        }
    }

    /// Strip the trailing sentinel and join the stream into text.
    pub fn into_text(mut self) -> String {
        debug_assert!(matches!(
            self.tokens.last(),
            None | Some(Token::EndOfMessage)
        ));
        if self.tokens.last() == Some(&Token::EndOfMessage) {
            self.tokens.pop();
        }
        detokenize(&self.tokens)
    }

    /// Emit an equal chunk.
    ///
    /// A chunk longer than one token is a reliable match and decays the
    /// debt. A single-token match never does: matchers routinely pair a
    /// lone space or punctuation mark across unrelated lines, and such a
    /// coincidence must not cancel newlines still owed.
    fn push_unrevised(&mut self, mut chunk: Vec<Token>) {
        self.preempt_chunk(&mut chunk);
        if chunk.len() > 1 {
            self.line_debt = self.decay.apply(self.line_debt);
        }
        self.tokens.extend(chunk);
    }

    /// Emit a revised chunk, converting spaces to newlines while debt
    /// remains outstanding.
    fn push_revised(&mut self, mut chunk: Vec<Token>, inserted: bool) {
        let start = if self.preempt_chunk(&mut chunk) { 1 } else { 0 };
        let mut prev = if start > 0 {
            Some(chunk[0].clone())
        } else {
            self.tokens.last().cloned()
        };
        for i in start..chunk.len() {
            if chunk[i].is_newline() {
                self.line_debt -= 1;
            } else if self.line_debt > 0
                && prev.as_ref().is_some_and(|t| t.is_clause_end())
                && chunk[i].is_space()
            {
                chunk[i] = Token::Newline;
                self.line_debt -= 1;
            }
            prev = Some(chunk[i].clone());
        }
        if inserted && count_newlines(&chunk) > 1 {
            // A freshly inserted passage spanning several lines makes the
            // outstanding debt meaningless.
            self.line_debt = 0;
        }
        self.tokens.extend(chunk);
    }

    /// Turn the leading space of a chunk into an owed newline, unless the
    /// stream already sits at a line break. Returns whether it fired.
    fn preempt_chunk(&mut self, chunk: &mut [Token]) -> bool {
        let at_line_break = matches!(self.tokens.last(), Some(t) if t.is_newline());
        if self.line_debt > 0
            && !at_line_break
            && chunk.first().is_some_and(|t| t.is_space())
        {
            chunk[0] = Token::Newline;
            self.line_debt -= 1;
            true
        } else {
            false
        }
    }

    /// Deleted indentation or blank-line padding at a line boundary is
    /// almost always noise rather than an intended structural edit;
    /// re-emit the span verbatim. Anything else stays deleted.
    fn undo_petty_deletion(&mut self, orig: Vec<Token>) {
        let at_line_start = match self.tokens.last() {
            None => true,
            Some(t) => t.is_newline(),
        };
        if at_line_start && !orig.is_empty() && orig.iter().all(Token::is_whitespace) {
            self.tokens.extend(orig);
        }
    }
}

fn count_newlines(tokens: &[Token]) -> usize {
    tokens.iter().filter(|t| t.is_newline()).count()
}

/// Revisions are adapted as newline-terminated text; append the final
/// newline if the revision lacked one. An empty revision becomes `"\n"`.
pub fn ensure_trailing_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{text}\n")
    }
}

/// Adapt one revision against a prepared matcher.
pub fn adapt_revision(
    matcher: &TokenSequenceMatcher,
    rev_text: &str,
    decay: DebtDecay,
) -> String {
    let rev_text = ensure_trailing_newline(rev_text);
    let mut adapted = AdaptedRevision::new(decay);
    for op in matcher.operations(&rev_text) {
        adapted.push_operation(op);
    }
    adapted.into_text()
}

/// Render the operations and the running line debt for one adaptation.
///
/// One line per operation: `==` for unrevised spans, `>>` for replaced
/// spans, `+>` for tokens the revision added, `x>` for original tokens
/// the revision dropped; each line ends with the debt left after applying
/// the operation. Meant for debugging surprising adaptations.
pub fn operation_trace(orig_text: &str, rev_text: &str) -> String {
    let matcher = TokenSequenceMatcher::new(orig_text);
    let rev_text = ensure_trailing_newline(rev_text);
    let mut adapted = AdaptedRevision::new(DebtDecay::default());
    let mut out = String::new();
    for op in matcher.operations(&rev_text) {
        let line = match op.tag {
            OpTag::Equal => format!("== {:?}", detokenize(&op.revised)),
            OpTag::Replace => format!(
                "{:?} >> {:?}",
                detokenize(&op.original),
                detokenize(&op.revised)
            ),
            OpTag::Insert => format!("+> {:?}", detokenize(&op.revised)),
            OpTag::Delete => format!("{:?} x>", detokenize(&op.original)),
        };
        adapted.push_operation(op);
        out.push_str(&line);
        out.push_str(&format!(" | debt {}\n", adapted.line_debt));
    }
    out
}
