//! # Kindred
//!
//! A relevancy-feedback term selection and query expansion library for Rust.
//!
//! Given a seed — a set of documents in a host index, or a block of free
//! text — Kindred extracts the statistically salient terms per configured
//! field, scores and ranks them, and synthesizes a weighted disjunctive
//! query combined with exclusion clauses, match/differ constraints, an
//! optional boost function, and an optional base query.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Engine-agnostic query AST (one translation per target engine)
//! - Pluggable text analysis for content-stream seeds
//! - Payload-aware term scoring
//! - Explainable ranked term output
//!
//! The pipeline is linear and stateless per request: collect → score →
//! select → synthesize → compose. The host search engine is reached only
//! through the [`index::IndexReader`] trait; query execution stays on the
//! host side.

pub mod analysis;
pub mod error;
pub mod feedback;
pub mod index;
pub mod query;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
