//! Analyzer implementations that convert text into token streams.
//!
//! # Examples
//!
//! ```
//! use kindred::analysis::analyzer::{Analyzer, StandardAnalyzer};
//!
//! let analyzer = StandardAnalyzer::new();
//! let tokens: Vec<_> = analyzer.analyze("Hello, World!").unwrap().collect();
//! assert_eq!(tokens[0].text, "hello");
//! assert_eq!(tokens[1].text, "world");
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// An analyzer that splits text on Unicode word boundaries and lowercases.
///
/// This analyzer uses the Unicode Text Segmentation algorithm (UAX #29) to
/// identify word boundaries, filters out punctuation and whitespace, and
/// lowercases the surviving words.
#[derive(Clone, Debug, Default)]
pub struct StandardAnalyzer;

impl StandardAnalyzer {
    /// Create a new standard analyzer.
    pub fn new() -> Self {
        StandardAnalyzer
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = text
            .unicode_words()
            .enumerate()
            .map(|(position, word)| Token::new(word.to_lowercase(), position))
            .collect();
        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

/// An analyzer that splits text on whitespace without further processing.
///
/// Token text is preserved exactly, including case and punctuation.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceAnalyzer;

impl WhitespaceAnalyzer {
    /// Create a new whitespace analyzer.
    pub fn new() -> Self {
        WhitespaceAnalyzer
    }
}

impl Analyzer for WhitespaceAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = text
            .split_whitespace()
            .enumerate()
            .map(|(position, word)| Token::new(word, position))
            .collect();
        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

/// An analyzer that emits the whole input as a single token.
///
/// Useful for identifier and category fields where the stored value is the
/// indexed term.
#[derive(Clone, Debug, Default)]
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    /// Create a new keyword analyzer.
    pub fn new() -> Self {
        KeywordAnalyzer
    }
}

impl Analyzer for KeywordAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Box::new(std::iter::empty()));
        }
        Ok(Box::new(std::iter::once(Token::new(trimmed, 0))))
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}
