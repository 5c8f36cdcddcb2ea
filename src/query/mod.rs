//! Engine-agnostic query representation.
//!
//! The composed output of the feedback pipeline is a closed query AST
//! ([`ast::QueryNode`]); each target search engine needs exactly one
//! translation function from this AST to its native query type. Query
//! execution never happens inside this crate.

pub mod ast;
pub mod min_should_match;

pub use ast::{BooleanClause, BooleanQuery, Occur, QueryNode};
pub use min_should_match::MinShouldMatch;
