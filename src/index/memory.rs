//! In-memory reference implementation of [`IndexReader`].
//!
//! `MemoryIndex` indexes document text through pluggable analyzers,
//! accepts explicit term vectors (with payloads), tracks document
//! frequencies, and serves stored values. It backs the test suite and
//! demonstrates what a host-engine adapter has to provide. It does not
//! execute queries.
//!
//! # Examples
//!
//! ```
//! use kindred::index::{IndexReader, MemoryIndex};
//!
//! let mut index = MemoryIndex::builder("id").build();
//! let doc_id = index
//!     .add_document(
//!         MemoryIndex::doc()
//!             .stored("id", "D1")
//!             .text("title", "red shoes red"),
//!     )
//!     .unwrap();
//!
//! assert_eq!(index.doc_count(), 1);
//! let vector = index.term_vector(doc_id, "title").unwrap().unwrap();
//! assert_eq!(vector[0].term, "red");
//! assert_eq!(vector[0].freq, 2);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::{Analyzer, StandardAnalyzer};
use crate::error::{KindredError, Result};
use crate::index::{IndexReader, TermVectorEntry};

#[derive(Debug, Clone, Default)]
struct VectorCell {
    freq: u64,
    payload_sum: f32,
    payload_count: u64,
}

/// One indexed document's stored values and per-field term vectors.
#[derive(Default)]
struct StoredDoc {
    stored: AHashMap<String, Vec<String>>,
    // BTreeMap keeps term vectors in ascending term order.
    vectors: AHashMap<String, BTreeMap<String, VectorCell>>,
}

/// A document being assembled for insertion into a [`MemoryIndex`].
#[derive(Default)]
pub struct MemoryDocument {
    texts: Vec<(String, String)>,
    stored: Vec<(String, String)>,
    vectors: Vec<(String, Vec<TermVectorEntry>)>,
}

impl MemoryDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        MemoryDocument::default()
    }

    /// Add a text field: analyzed into the field's term vector and stored.
    pub fn text<F: Into<String>, V: Into<String>>(mut self, field: F, value: V) -> Self {
        self.texts.push((field.into(), value.into()));
        self
    }

    /// Add a stored-only field value (unique keys, constraint fields).
    pub fn stored<F: Into<String>, V: Into<String>>(mut self, field: F, value: V) -> Self {
        self.stored.push((field.into(), value.into()));
        self
    }

    /// Add an explicit term vector for a field, bypassing analysis.
    ///
    /// Entries may carry mean payload values.
    pub fn term_vector<F: Into<String>>(mut self, field: F, entries: Vec<TermVectorEntry>) -> Self {
        self.vectors.push((field.into(), entries));
        self
    }
}

/// Builder for [`MemoryIndex`].
pub struct MemoryIndexBuilder {
    unique_key: String,
    default_analyzer: Arc<dyn Analyzer>,
    analyzers: AHashMap<String, Arc<dyn Analyzer>>,
}

impl MemoryIndexBuilder {
    /// Create a builder with the given unique-key field name.
    pub fn new<S: Into<String>>(unique_key: S) -> Self {
        MemoryIndexBuilder {
            unique_key: unique_key.into(),
            default_analyzer: Arc::new(StandardAnalyzer::new()),
            analyzers: AHashMap::new(),
        }
    }

    /// Set the analyzer for a specific field.
    pub fn analyzer<S: Into<String>>(mut self, field: S, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzers.insert(field.into(), analyzer);
        self
    }

    /// Set the analyzer used for fields without a specific one.
    pub fn default_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.default_analyzer = analyzer;
        self
    }

    /// Build the (empty) index.
    pub fn build(self) -> MemoryIndex {
        MemoryIndex {
            unique_key: self.unique_key,
            default_analyzer: self.default_analyzer,
            analyzers: self.analyzers,
            docs: Vec::new(),
            doc_freqs: AHashMap::new(),
        }
    }
}

/// An in-memory index implementing [`IndexReader`].
pub struct MemoryIndex {
    unique_key: String,
    default_analyzer: Arc<dyn Analyzer>,
    analyzers: AHashMap<String, Arc<dyn Analyzer>>,
    docs: Vec<StoredDoc>,
    doc_freqs: AHashMap<String, AHashMap<String, u64>>,
}

impl MemoryIndex {
    /// Create a builder with the given unique-key field name.
    pub fn builder<S: Into<String>>(unique_key: S) -> MemoryIndexBuilder {
        MemoryIndexBuilder::new(unique_key)
    }

    /// Create a document builder.
    pub fn doc() -> MemoryDocument {
        MemoryDocument::new()
    }

    /// Add a document to the index, returning its internal id.
    pub fn add_document(&mut self, document: MemoryDocument) -> Result<u64> {
        let mut doc = StoredDoc::default();

        for (field, value) in &document.stored {
            doc.stored
                .entry(field.clone())
                .or_default()
                .push(value.clone());
        }

        for (field, value) in &document.texts {
            doc.stored
                .entry(field.clone())
                .or_default()
                .push(value.clone());

            let analyzer = self
                .analyzers
                .get(field)
                .unwrap_or(&self.default_analyzer)
                .clone();
            let vector = doc.vectors.entry(field.clone()).or_default();
            for token in analyzer.analyze(value)? {
                vector.entry(token.text).or_default().freq += 1;
            }
        }

        for (field, entries) in &document.vectors {
            let vector = doc.vectors.entry(field.clone()).or_default();
            for entry in entries {
                let cell = vector.entry(entry.term.clone()).or_default();
                cell.freq += entry.freq;
                if let Some(payload) = entry.payload {
                    cell.payload_sum += payload * entry.freq as f32;
                    cell.payload_count += entry.freq;
                }
            }
        }

        for (field, vector) in &doc.vectors {
            let freqs = self.doc_freqs.entry(field.clone()).or_default();
            for term in vector.keys() {
                *freqs.entry(term.clone()).or_default() += 1;
            }
        }

        self.docs.push(doc);
        Ok((self.docs.len() - 1) as u64)
    }

    fn stored_doc(&self, doc_id: u64) -> Result<&StoredDoc> {
        self.docs
            .get(doc_id as usize)
            .ok_or_else(|| KindredError::index(format!("document {doc_id} does not exist")))
    }
}

impl IndexReader for MemoryIndex {
    fn doc_count(&self) -> u64 {
        self.docs.len() as u64
    }

    fn term_doc_freq(&self, field: &str, term: &str) -> Result<u64> {
        Ok(self
            .doc_freqs
            .get(field)
            .and_then(|freqs| freqs.get(term))
            .copied()
            .unwrap_or(0))
    }

    fn term_vector(&self, doc_id: u64, field: &str) -> Result<Option<Vec<TermVectorEntry>>> {
        let doc = self.stored_doc(doc_id)?;
        let Some(vector) = doc.vectors.get(field) else {
            return Ok(None);
        };
        let entries = vector
            .iter()
            .map(|(term, cell)| TermVectorEntry {
                term: term.clone(),
                freq: cell.freq,
                payload: (cell.payload_count > 0)
                    .then(|| cell.payload_sum / cell.payload_count as f32),
            })
            .collect();
        Ok(Some(entries))
    }

    fn stored_values(&self, doc_id: u64, field: &str) -> Result<Vec<String>> {
        Ok(self
            .stored_doc(doc_id)?
            .stored
            .get(field)
            .cloned()
            .unwrap_or_default())
    }

    fn unique_key_field(&self) -> &str {
        &self.unique_key
    }

    fn analyzer(&self, field: &str) -> Result<Arc<dyn Analyzer>> {
        Ok(self
            .analyzers
            .get(field)
            .unwrap_or(&self.default_analyzer)
            .clone())
    }
}
