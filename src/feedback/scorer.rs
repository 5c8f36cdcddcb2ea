//! Term scoring against collection statistics.
//!
//! Each candidate's weight is `tf × idf × fieldBoost`, where `tf` is the
//! raw accumulated frequency (or `ln(1 + tf)` with `rf.logtf`), `idf` is
//! `ln(totalDocs / (docFreq + 1))` from host statistics scoped to the
//! field, and the field boost comes from the table matching the seed kind,
//! normalized to sum to 1.0 when `rf.normflboosts` is set. Candidates
//! outside the configured frequency bands are excluded, not scored: too
//! rare is noise, too common is non-discriminating.

use ahash::AHashMap;
use log::trace;

use crate::error::Result;
use crate::feedback::config::FeedbackConfig;
use crate::feedback::seed::SeedKind;
use crate::feedback::term::{CandidateTerm, CollectedTerms, RankedTerm};
use crate::index::IndexReader;

/// Scored terms grouped per field, ready for selection.
pub type ScoredTerms = AHashMap<String, Vec<RankedTerm>>;

/// Scores candidate terms for one seed kind.
pub struct TermScorer<'a> {
    config: &'a FeedbackConfig,
    boosts: AHashMap<String, f32>,
}

impl<'a> TermScorer<'a> {
    /// Create a scorer; the seed kind selects the field-boost table.
    pub fn new(config: &'a FeedbackConfig, kind: SeedKind) -> Self {
        TermScorer {
            config,
            boosts: config.effective_field_boosts(kind),
        }
    }

    /// The effective per-field boosts in use (after normalization).
    pub fn field_boosts(&self) -> &AHashMap<String, f32> {
        &self.boosts
    }

    /// Score every collected candidate, dropping excluded ones.
    pub fn score_all(
        &self,
        reader: &dyn IndexReader,
        collected: &CollectedTerms,
    ) -> Result<ScoredTerms> {
        let mut scored: ScoredTerms = AHashMap::new();
        for (field, candidates) in collected.iter() {
            for candidate in candidates {
                if let Some(term) = self.score(reader, candidate)? {
                    scored.entry(field.to_string()).or_default().push(term);
                }
            }
        }
        Ok(scored)
    }

    /// Score one candidate, or return `None` when it is excluded.
    pub fn score(
        &self,
        reader: &dyn IndexReader,
        candidate: &CandidateTerm,
    ) -> Result<Option<RankedTerm>> {
        if candidate.freq < self.config.min_term_freq {
            trace!("{}:{} excluded: tf {} too low", candidate.field, candidate.text, candidate.freq);
            return Ok(None);
        }

        let doc_freq = reader.term_doc_freq(&candidate.field, &candidate.text)?;
        if doc_freq < self.config.min_doc_freq || doc_freq > self.config.max_doc_freq {
            trace!("{}:{} excluded: df {} out of band", candidate.field, candidate.text, doc_freq);
            return Ok(None);
        }

        let tf = if self.config.log_tf {
            (1.0 + candidate.freq as f32).ln()
        } else {
            candidate.freq as f32
        };

        let doc_count = reader.doc_count();
        let idf = if doc_count == 0 {
            0.0
        } else {
            (doc_count as f32 / (doc_freq + 1) as f32).ln()
        };

        let field_boost = self.boosts.get(&candidate.field).copied().unwrap_or(1.0);

        Ok(Some(RankedTerm {
            field: candidate.field.clone(),
            text: candidate.text.clone(),
            raw_tf: candidate.freq,
            doc_freq,
            tf,
            idf,
            field_boost,
            payload: candidate.mean_payload(),
        }))
    }
}
