//! The host engine seam.
//!
//! The feedback pipeline never owns an index. Everything it needs from the
//! host search engine — collection statistics, per-document term vectors,
//! stored field values, analyzers — is reached through the [`IndexReader`]
//! trait. Implementations are expected to be safe for concurrent read
//! access; the pipeline itself holds no locks and keeps no state between
//! requests.
//!
//! [`memory::MemoryIndex`] is a complete in-memory implementation used by
//! the test suite and as a reference for adapter authors.

pub mod memory;

use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::error::Result;

pub use memory::{MemoryIndex, MemoryIndexBuilder};

/// One entry of a per-document field term vector.
#[derive(Debug, Clone, PartialEq)]
pub struct TermVectorEntry {
    /// The term text.
    pub term: String,
    /// Number of occurrences of the term in this document's field.
    pub freq: u64,
    /// Mean per-occurrence payload value, when the field carries payloads.
    pub payload: Option<f32>,
}

impl TermVectorEntry {
    /// Create a term vector entry without a payload.
    pub fn new<S: Into<String>>(term: S, freq: u64) -> Self {
        TermVectorEntry {
            term: term.into(),
            freq,
            payload: None,
        }
    }

    /// Create a term vector entry with a mean payload value.
    pub fn with_payload<S: Into<String>>(term: S, freq: u64, payload: f32) -> Self {
        TermVectorEntry {
            term: term.into(),
            freq,
            payload: Some(payload),
        }
    }
}

/// Read-only access to the host engine's index.
///
/// All methods are scoped to a single point-in-time view of the index;
/// the pipeline assumes the statistics do not change during a request.
pub trait IndexReader: Send + Sync {
    /// Get the number of documents in the collection.
    fn doc_count(&self) -> u64;

    /// Get the document frequency of a term in a field.
    fn term_doc_freq(&self, field: &str, term: &str) -> Result<u64>;

    /// Get the term vector of a document field, in ascending term order.
    ///
    /// Returns `None` when the document has no content for the field.
    fn term_vector(&self, doc_id: u64, field: &str) -> Result<Option<Vec<TermVectorEntry>>>;

    /// Get the stored (externally visible) values of a document field.
    fn stored_values(&self, doc_id: u64, field: &str) -> Result<Vec<String>>;

    /// Get the name of the collection's unique-key field.
    fn unique_key_field(&self) -> &str;

    /// Get the analyzer configured for a field.
    fn analyzer(&self, field: &str) -> Result<Arc<dyn Analyzer>>;
}
