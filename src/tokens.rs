//! Token definitions and tokenization
//!
//! Raw tokenization is done with the logos lexer library. The grammar is
//! deliberately tiny: a maximal run of word characters, a single newline,
//! or any other single character. Every space is its own token so that
//! later stages can swap an individual space for a newline.
//!
//! A second step lifts raw lexemes into [`Token`] values and appends the
//! synthetic end-of-message token that the sequence matcher relies on.

use logos::Logos;

/// Raw lexemes produced by the logos lexer.
#[derive(Logos, Debug, PartialEq, Clone)]
enum Lexeme {
    /// Maximal run of word characters (alphanumerics and underscore)
    #[regex(r"\w+")]
    Word,

    /// A single newline
    #[token("\n")]
    Newline,

    /// Any other single character, spaces included
    #[regex(r"[^\w\n]")]
    Other,
}

/// The atomic unit of text the adaptation engine manipulates.
///
/// Concatenating the texts of a token sequence reconstructs the input
/// exactly; no character is dropped by tokenization. `EndOfMessage` is
/// synthetic and contributes nothing to the reconstructed text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Token {
    /// A maximal run of word characters (alphanumerics and underscore)
    Word(String),

    /// A single newline character
    Newline,

    /// Any other single character; each space is its own token
    Other(char),

    /// Synthetic end-of-message marker appended before sequence matching
    EndOfMessage,
}

impl Token {
    /// Check if this token is a single blank space
    pub fn is_space(&self) -> bool {
        matches!(self, Token::Other(' '))
    }

    /// Check if this token is a newline
    pub fn is_newline(&self) -> bool {
        matches!(self, Token::Newline)
    }

    /// Check if this token is whitespace of any kind, newlines included
    pub fn is_whitespace(&self) -> bool {
        match self {
            Token::Newline => true,
            Token::Other(ch) => ch.is_whitespace(),
            Token::Word(_) | Token::EndOfMessage => false,
        }
    }

    /// Check if this token is punctuation that can end a clause, after
    /// which a reinserted line break reads naturally
    pub fn is_clause_end(&self) -> bool {
        matches!(self, Token::Other('.' | ',' | ';'))
    }
}

/// Tokenize text into the flat token sequence it losslessly decomposes to.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut lexer = Lexeme::lexer(text);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let slice = lexer.slice();
        match result {
            Ok(Lexeme::Word) => tokens.push(Token::Word(slice.to_string())),
            Ok(Lexeme::Newline) => tokens.push(Token::Newline),
            Ok(Lexeme::Other) => {
                if let Some(ch) = slice.chars().next() {
                    tokens.push(Token::Other(ch));
                }
            }
            Err(_) => {
                // The three patterns cover every character, but recovering
                // per character keeps tokenization total either way.
                for ch in slice.chars() {
                    tokens.push(match ch {
                        '\n' => Token::Newline,
                        other => Token::Other(other),
                    });
                }
            }
        }
    }

    tokens
}

/// Tokenize text and append the end-of-message token.
///
/// Both sides of a sequence match carry the sentinel, which guarantees the
/// alignment always terminates with a matched pair and keeps the trailing
/// boundary logic out of the adaptation pass.
pub fn tokenize_with_sentinel(text: &str) -> Vec<Token> {
    let mut tokens = tokenize(text);
    tokens.push(Token::EndOfMessage);
    tokens
}

/// Join a token stream back into a string.
///
/// The synthetic end-of-message token contributes nothing.
pub fn detokenize(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Word(text) => out.push_str(text),
            Token::Newline => out.push('\n'),
            Token::Other(ch) => out.push(*ch),
            Token::EndOfMessage => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizes_words_and_spaces() {
        let tokens = tokenize("hello world");
        assert_eq!(
            tokens,
            vec![
                Token::Word("hello".to_string()),
                Token::Other(' '),
                Token::Word("world".to_string()),
            ]
        );
    }

    #[test]
    fn test_every_space_is_its_own_token() {
        let tokens = tokenize("a  b");
        assert_eq!(
            tokens,
            vec![
                Token::Word("a".to_string()),
                Token::Other(' '),
                Token::Other(' '),
                Token::Word("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_punctuation_and_newlines() {
        let tokens = tokenize("1. Item\n");
        assert_eq!(
            tokens,
            vec![
                Token::Word("1".to_string()),
                Token::Other('.'),
                Token::Other(' '),
                Token::Word("Item".to_string()),
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize(""), vec![]);
    }

    #[test]
    fn test_whitespace_only() {
        let tokens = tokenize(" \t\n");
        assert_eq!(
            tokens,
            vec![Token::Other(' '), Token::Other('\t'), Token::Newline]
        );
    }

    #[test]
    fn test_sentinel_is_appended_last() {
        let tokens = tokenize_with_sentinel("x");
        assert_eq!(tokens.last(), Some(&Token::EndOfMessage));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_detokenize_roundtrip() {
        let source = "Some text, with punctuation;\n    and an indented line.\n";
        assert_eq!(detokenize(&tokenize(source)), source);
    }

    #[test]
    fn test_detokenize_skips_sentinel() {
        let source = "word\n";
        assert_eq!(detokenize(&tokenize_with_sentinel(source)), source);
    }

    #[test]
    fn test_predicates() {
        assert!(Token::Other(' ').is_space());
        assert!(!Token::Other('\t').is_space());

        assert!(Token::Newline.is_newline());
        assert!(!Token::Other(' ').is_newline());

        assert!(Token::Other(' ').is_whitespace());
        assert!(Token::Other('\t').is_whitespace());
        assert!(Token::Newline.is_whitespace());
        assert!(!Token::Word("x".to_string()).is_whitespace());
        assert!(!Token::EndOfMessage.is_whitespace());

        assert!(Token::Other('.').is_clause_end());
        assert!(Token::Other(',').is_clause_end());
        assert!(Token::Other(';').is_clause_end());
        assert!(!Token::Other(':').is_clause_end());
        assert!(!Token::Newline.is_clause_end());
    }
}
