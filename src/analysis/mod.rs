//! Text analysis for content-stream seeds.
//!
//! When a seed arrives as free text rather than as indexed documents, the
//! text has to be tokenized the same way the target field was tokenized at
//! index time. This module provides the [`Analyzer`] trait for that seam
//! and a small set of concrete analyzers.

pub mod analyzer;
pub mod token;

pub use analyzer::{Analyzer, KeywordAnalyzer, StandardAnalyzer, WhitespaceAnalyzer};
pub use token::{Token, TokenStream};
