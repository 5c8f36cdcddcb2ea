//! Token types for text analysis.

use std::fmt;

/// A token represents a single unit of text after tokenization.
///
/// # Examples
///
/// ```
/// use kindred::analysis::token::Token;
///
/// let token = Token::new("hello", 0);
/// assert_eq!(token.text, "hello");
/// assert_eq!(token.position, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token's text content.
    pub text: String,
    /// Position in the token stream (0-based).
    pub position: usize,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            text: text.into(),
            position,
        }
    }

    /// Get the character length of this token.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the token text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.text, self.position)
    }
}

/// A stream of tokens produced by an analyzer.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new("hello", 3);
        assert_eq!(token.text, "hello");
        assert_eq!(token.position, 3);
        assert!(!token.is_empty());
    }

    #[test]
    fn test_token_char_length() {
        // len counts characters, not bytes
        let token = Token::new("café", 0);
        assert_eq!(token.len(), 4);
    }

    #[test]
    fn test_token_display() {
        let token = Token::new("term", 7);
        assert_eq!(token.to_string(), "term@7");
    }
}
