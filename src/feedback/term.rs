//! Candidate and ranked term types.

use std::cmp::Ordering;

use ahash::AHashMap;
use serde::Serialize;

/// A term candidate accumulated during collection.
///
/// Frequencies sum across all seed documents; document frequency is
/// resolved from host statistics at scoring time. Discarded after
/// scoring and selection.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTerm {
    /// The similarity field the term was collected from.
    pub field: String,
    /// The term text.
    pub text: String,
    /// Accumulated raw frequency across the seed.
    pub freq: u64,
    payload_sum: f32,
    payload_freq: u64,
}

impl CandidateTerm {
    /// Create a new candidate with zero frequency.
    pub fn new<F: Into<String>, T: Into<String>>(field: F, text: T) -> Self {
        CandidateTerm {
            field: field.into(),
            text: text.into(),
            freq: 0,
            payload_sum: 0.0,
            payload_freq: 0,
        }
    }

    /// Accumulate occurrences, optionally carrying a mean payload value.
    pub fn accumulate(&mut self, freq: u64, payload: Option<f32>) {
        self.freq += freq;
        if let Some(payload) = payload {
            self.payload_sum += payload * freq as f32;
            self.payload_freq += freq;
        }
    }

    /// Mean payload value over the accumulated occurrences, if any carried one.
    pub fn mean_payload(&self) -> Option<f32> {
        (self.payload_freq > 0).then(|| self.payload_sum / self.payload_freq as f32)
    }
}

/// Per-field candidate terms produced by the collector.
#[derive(Debug, Clone, Default)]
pub struct CollectedTerms {
    fields: AHashMap<String, AHashMap<String, CandidateTerm>>,
}

impl CollectedTerms {
    /// Create an empty collection.
    pub fn new() -> Self {
        CollectedTerms::default()
    }

    /// Accumulate a term occurrence count for a field.
    pub fn accumulate(&mut self, field: &str, term: &str, freq: u64, payload: Option<f32>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .entry(term.to_string())
            .or_insert_with(|| CandidateTerm::new(field, term))
            .accumulate(freq, payload);
    }

    /// Check whether no terms were collected at all.
    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|terms| terms.is_empty())
    }

    /// Total number of distinct (field, term) candidates.
    pub fn len(&self) -> usize {
        self.fields.values().map(|terms| terms.len()).sum()
    }

    /// Iterate over fields and their candidates.
    pub fn iter(&self) -> impl Iterator<Item = (&str, impl Iterator<Item = &CandidateTerm>)> {
        self.fields
            .iter()
            .map(|(field, terms)| (field.as_str(), terms.values()))
    }

    /// Get the candidates collected for one field.
    pub fn field(&self, field: &str) -> impl Iterator<Item = &CandidateTerm> {
        self.fields.get(field).into_iter().flat_map(|t| t.values())
    }
}

/// A scored, immutable term ready for synthesis and explain output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTerm {
    /// The similarity field the term was collected from.
    pub field: String,
    /// The term text.
    pub text: String,
    /// Accumulated raw frequency across the seed.
    pub raw_tf: u64,
    /// Document frequency in the collection, scoped to the field.
    pub doc_freq: u64,
    /// Term-frequency component (raw or log-scaled).
    pub tf: f32,
    /// Inverse document frequency.
    pub idf: f32,
    /// Effective boost of the term's field.
    pub field_boost: f32,
    /// Mean payload value, when the field carries payloads.
    pub payload: Option<f32>,
}

impl RankedTerm {
    /// Boost-independent score: `tf × idf`.
    pub fn score(&self) -> f32 {
        self.tf * self.idf
    }

    /// Final weight: `tf × idf × fieldBoost`.
    pub fn weight(&self) -> f32 {
        self.score() * self.field_boost
    }

    /// Qualified `field:text` label used in explain output.
    pub fn label(&self) -> String {
        format!("{}:{}", self.field, self.text)
    }

    /// Selection order: weight descending, ties by (field, text) ascending
    /// for determinism.
    pub fn selection_order(a: &RankedTerm, b: &RankedTerm) -> Ordering {
        b.weight()
            .partial_cmp(&a.weight())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.field.cmp(&b.field))
            .then_with(|| a.text.cmp(&b.text))
    }

    /// Stable display order: (field, text) ascending.
    pub fn display_order(a: &RankedTerm, b: &RankedTerm) -> Ordering {
        a.field.cmp(&b.field).then_with(|| a.text.cmp(&b.text))
    }
}
