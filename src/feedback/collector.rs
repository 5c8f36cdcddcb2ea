//! Term collection from seed documents or seed text.
//!
//! The collector gathers raw per-field term frequencies: from the host's
//! term vectors for document seeds, or by analyzing the supplied text for
//! content-stream seeds. Frequencies sum across all seed documents.
//! Word-length filtering happens here, before counting; frequency and
//! document-frequency filtering belong to the scorer.

use log::debug;

use crate::error::Result;
use crate::feedback::config::{FeedbackConfig, FieldConfig};
use crate::feedback::seed::Seed;
use crate::feedback::term::CollectedTerms;
use crate::index::IndexReader;

/// Collects candidate terms from a seed.
pub struct TermCollector<'a> {
    config: &'a FeedbackConfig,
}

impl<'a> TermCollector<'a> {
    /// Create a collector over the given configuration.
    pub fn new(config: &'a FeedbackConfig) -> Self {
        TermCollector { config }
    }

    /// Collect per-field term frequencies from the seed.
    ///
    /// An empty seed, or a seed whose tokens all fail the word-length
    /// bounds, yields an empty result rather than an error.
    pub fn collect(&self, reader: &dyn IndexReader, seed: &Seed) -> Result<CollectedTerms> {
        let mut collected = CollectedTerms::new();
        match seed {
            Seed::Documents(doc_ids) => {
                for &doc_id in doc_ids {
                    for field in self.config.field_configs() {
                        self.collect_from_vector(reader, doc_id, &field, &mut collected)?;
                    }
                }
            }
            Seed::Text(sections) => {
                for section in sections {
                    for field_name in &section.fields {
                        // Unconfigured target fields contribute nothing.
                        let Some(field) = self.config.field_config(field_name) else {
                            continue;
                        };
                        self.collect_from_text(reader, &section.text, &field, &mut collected)?;
                    }
                }
            }
        }
        debug!(
            "collected {} candidate terms from {:?} seed",
            collected.len(),
            seed.kind()
        );
        Ok(collected)
    }

    /// Read one document field's term vector, clipped to the token budget.
    ///
    /// Entries arrive in ascending term order, so the budget clips
    /// deterministically. Every token read consumes budget whether or not
    /// the term survives the word-length filter.
    fn collect_from_vector(
        &self,
        reader: &dyn IndexReader,
        doc_id: u64,
        field: &FieldConfig,
        collected: &mut CollectedTerms,
    ) -> Result<()> {
        let Some(vector) = reader.term_vector(doc_id, &field.name)? else {
            return Ok(());
        };

        let mut budget = field.max_tokens_parsed;
        for entry in vector {
            if budget == 0 {
                break;
            }
            let counted = entry.freq.min(budget as u64);
            budget -= counted as usize;
            if !field.accepts_word(&entry.term) {
                continue;
            }
            collected.accumulate(&field.name, &entry.term, counted, entry.payload);
        }
        Ok(())
    }

    /// Analyze a text section against one target field, clipped to the
    /// token budget.
    fn collect_from_text(
        &self,
        reader: &dyn IndexReader,
        text: &str,
        field: &FieldConfig,
        collected: &mut CollectedTerms,
    ) -> Result<()> {
        let analyzer = reader.analyzer(&field.name)?;
        let mut budget = field.max_tokens_parsed;
        for token in analyzer.analyze(text)? {
            if budget == 0 {
                break;
            }
            budget -= 1;
            if !field.accepts_word(&token.text) {
                continue;
            }
            collected.accumulate(&field.name, &token.text, 1, None);
        }
        Ok(())
    }
}
