//! Token sequence alignment
//!
//! Aligns a revised token sequence against the original ("focal") sequence
//! and reports the result as an ordered list of [`Operation`]s whose spans
//! partition both sequences. The matcher anchors on the longest common
//! block of tokens, recurses on the unmatched regions to either side, and
//! then classifies the remaining gaps.
//!
//! Lone space tokens are junk for anchor seeding: a space matches spaces
//! everywhere, and letting spaces seed anchors produces absurd alignments
//! between unrelated lines. Junk tokens still join a match when they sit
//! directly at its edges. There is no length-based short-circuiting; the
//! alignment is exact for inputs of any size.

use std::collections::HashMap;

use crate::tokens::{tokenize_with_sentinel, Token};

/// How a span of revised tokens relates to a span of original tokens.
///
/// Tags name the edit the revision made to the original: `Insert` means
/// the revision added tokens the original does not have (empty original
/// span), `Delete` means the revision dropped original tokens (empty
/// revised span), `Replace` covers both spans non-empty. `Equal` spans are
/// token-for-token identical on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OpTag {
    Equal,
    Replace,
    Insert,
    Delete,
}

/// One aligned span pair.
///
/// Token vectors are owned so that downstream passes can rewrite
/// individual entries without touching the matcher's sequences.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Operation {
    pub tag: OpTag,
    pub revised: Vec<Token>,
    pub original: Vec<Token>,
}

/// A run of identical tokens: `alt[rev..rev + len] == focal[orig..orig + len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    rev: usize,
    orig: usize,
    len: usize,
}

fn is_junk(token: &Token) -> bool {
    token.is_space()
}

/// Matches revised token sequences against one fixed original sequence.
///
/// The original is tokenized and indexed once; [`operations`] borrows the
/// matcher immutably, so a single matcher serves any number of revisions,
/// sequentially or from multiple threads.
///
/// [`operations`]: TokenSequenceMatcher::operations
pub struct TokenSequenceMatcher {
    focal: Vec<Token>,
    /// Positions of each focal token, junk tokens excluded
    index: HashMap<Token, Vec<usize>>,
}

impl TokenSequenceMatcher {
    /// Tokenize the original text and build the position index.
    pub fn new(focal_text: &str) -> Self {
        let focal = tokenize_with_sentinel(focal_text);
        let mut index: HashMap<Token, Vec<usize>> = HashMap::new();
        for (j, token) in focal.iter().enumerate() {
            if !is_junk(token) {
                index.entry(token.clone()).or_default().push(j);
            }
        }
        Self { focal, index }
    }

    /// The original's token sequence, sentinel included.
    pub fn focal_tokens(&self) -> &[Token] {
        &self.focal
    }

    /// Align `alt_text` against the original and return the ordered
    /// operations covering both token sequences.
    pub fn operations(&self, alt_text: &str) -> Vec<Operation> {
        let alt = tokenize_with_sentinel(alt_text);
        let blocks = self.matching_blocks(&alt);

        let mut ops = Vec::new();
        let (mut i, mut j) = (0, 0);
        for block in blocks {
            let gap_tag = if i < block.rev && j < block.orig {
                Some(OpTag::Replace)
            } else if i < block.rev {
                Some(OpTag::Insert)
            } else if j < block.orig {
                Some(OpTag::Delete)
            } else {
                None
            };
            if let Some(tag) = gap_tag {
                ops.push(Operation {
                    tag,
                    revised: alt[i..block.rev].to_vec(),
                    original: self.focal[j..block.orig].to_vec(),
                });
            }
            if block.len > 0 {
                ops.push(Operation {
                    tag: OpTag::Equal,
                    revised: alt[block.rev..block.rev + block.len].to_vec(),
                    original: self.focal[block.orig..block.orig + block.len].to_vec(),
                });
            }
            i = block.rev + block.len;
            j = block.orig + block.len;
        }
        ops
    }

    /// All maximal matching blocks, in order, ending with a zero-length
    /// terminator at the end of both sequences.
    fn matching_blocks(&self, alt: &[Token]) -> Vec<Block> {
        let mut queue = vec![(0, alt.len(), 0, self.focal.len())];
        let mut found = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alt, alo, ahi, blo, bhi);
            if block.len > 0 {
                if alo < block.rev && blo < block.orig {
                    queue.push((alo, block.rev, blo, block.orig));
                }
                if block.rev + block.len < ahi && block.orig + block.len < bhi {
                    queue.push((block.rev + block.len, ahi, block.orig + block.len, bhi));
                }
                found.push(block);
            }
        }

        found.sort_by_key(|b| (b.rev, b.orig));

        // Adjacent blocks arise from the recursion splits; merge them so
        // every equal run is reported as one operation.
        let mut blocks: Vec<Block> = Vec::new();
        for block in found {
            if let Some(last) = blocks.last_mut() {
                if last.rev + last.len == block.rev && last.orig + last.len == block.orig {
                    last.len += block.len;
                    continue;
                }
            }
            blocks.push(block);
        }

        blocks.push(Block {
            rev: alt.len(),
            orig: self.focal.len(),
            len: 0,
        });
        blocks
    }

    /// Longest block of identical tokens within `alt[alo..ahi]` and
    /// `focal[blo..bhi]`, preferring the earliest on ties.
    fn find_longest_match(
        &self,
        alt: &[Token],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> Block {
        let focal = &self.focal;
        let mut best_i = alo;
        let mut best_j = blo;
        let mut best_len = 0;

        // For each alt position, chain lengths of runs ending at each
        // focal position. Junk never appears in the index, so seeded runs
        // neither start nor end on junk.
        let mut run_lengths: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut new_runs: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.index.get(&alt[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let len = j
                        .checked_sub(1)
                        .and_then(|prev| run_lengths.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    new_runs.insert(j, len);
                    if len > best_len {
                        best_i = i + 1 - len;
                        best_j = j + 1 - len;
                        best_len = len;
                    }
                }
            }
            run_lengths = new_runs;
        }

        // Widen over equal non-junk tokens at both edges, then absorb
        // equal junk sitting directly against the block.
        while best_i > alo
            && best_j > blo
            && !is_junk(&focal[best_j - 1])
            && alt[best_i - 1] == focal[best_j - 1]
        {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < ahi
            && best_j + best_len < bhi
            && !is_junk(&focal[best_j + best_len])
            && alt[best_i + best_len] == focal[best_j + best_len]
        {
            best_len += 1;
        }
        while best_i > alo
            && best_j > blo
            && is_junk(&focal[best_j - 1])
            && alt[best_i - 1] == focal[best_j - 1]
        {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < ahi
            && best_j + best_len < bhi
            && is_junk(&focal[best_j + best_len])
            && alt[best_i + best_len] == focal[best_j + best_len]
        {
            best_len += 1;
        }

        Block {
            rev: best_i,
            orig: best_j,
            len: best_len,
        }
    }
}
