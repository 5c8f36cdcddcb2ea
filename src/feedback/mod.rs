//! The relevancy-feedback pipeline.
//!
//! Five stages run in a fixed order per request: collect raw term
//! frequencies from the seed, score them against collection statistics,
//! select the top terms per field, synthesize a weighted disjunction, and
//! compose it with exclusions, constraints, boosts, and the optional base
//! query. [`FeedbackEngine`] wires the stages together; each stage is
//! also usable on its own.
//!
//! The pipeline is stateless per request and holds no locks; the host
//! index is reached only through [`crate::index::IndexReader`], assumed
//! safe for concurrent reads.
//!
//! # Examples
//!
//! ```
//! use kindred::feedback::{FeedbackConfig, FeedbackEngine, FeedbackRequest};
//! use kindred::index::MemoryIndex;
//!
//! let mut index = MemoryIndex::builder("id").build();
//! for (key, title) in [("D1", "red shoes"), ("D2", "red boots"), ("D3", "blue hat")] {
//!     index
//!         .add_document(MemoryIndex::doc().stored("id", key).text("title", title))
//!         .unwrap();
//! }
//!
//! let mut config = FeedbackConfig::new(vec!["title".into()]);
//! config.min_doc_freq = 1;
//! let engine = FeedbackEngine::new(config).unwrap();
//!
//! let composed = engine
//!     .execute(&index, &FeedbackRequest::from_documents(vec![0]))
//!     .unwrap();
//! assert!(!composed.terms().is_empty());
//! ```

pub mod collector;
pub mod composer;
pub mod config;
pub mod explain;
pub mod params;
pub mod scorer;
pub mod seed;
pub mod selector;
pub mod synthesizer;
pub mod term;

use log::debug;

use crate::error::{KindredError, Result};
use crate::index::IndexReader;
use crate::query::QueryNode;

pub use collector::TermCollector;
pub use composer::{ComposedQuery, QueryComposer};
pub use config::{FeedbackConfig, FieldConfig};
pub use explain::{InterestingTerms, TermDetail};
pub use params::TermStyle;
pub use scorer::TermScorer;
pub use seed::{Seed, SeedKind, TextSection};
pub use selector::TermSelector;
pub use synthesizer::{ExpansionQuery, QuerySynthesizer};
pub use term::{CandidateTerm, RankedTerm};

/// Per-request input: the seed and the optional externally supplied base
/// query.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRequest {
    /// The seed driving expansion.
    pub seed: Seed,
    /// Optional base query; when present it gates membership and the
    /// expansion re-ranks.
    pub base_query: Option<QueryNode>,
}

impl FeedbackRequest {
    /// Create a request seeded by documents in the host index.
    pub fn from_documents(doc_ids: Vec<u64>) -> Self {
        FeedbackRequest {
            seed: Seed::documents(doc_ids),
            base_query: None,
        }
    }

    /// Create a request seeded by a single block of text targeting fields.
    pub fn from_text<T: Into<String>>(text: T, fields: Vec<String>) -> Self {
        FeedbackRequest {
            seed: Seed::text(text, fields),
            base_query: None,
        }
    }

    /// Create a request from an arbitrary seed.
    pub fn new(seed: Seed) -> Self {
        FeedbackRequest {
            seed,
            base_query: None,
        }
    }

    /// Attach a base query.
    pub fn with_base_query(mut self, query: QueryNode) -> Self {
        self.base_query = Some(query);
        self
    }
}

/// The consolidated five-stage feedback engine.
///
/// One engine serves both seed kinds and both composition variants,
/// parameterized entirely by [`FeedbackConfig`].
#[derive(Debug)]
pub struct FeedbackEngine {
    config: FeedbackConfig,
}

impl FeedbackEngine {
    /// Create an engine, validating the configuration.
    pub fn new(config: FeedbackConfig) -> Result<Self> {
        config.validate()?;
        Ok(FeedbackEngine { config })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    /// Run the full pipeline for a request.
    ///
    /// An empty document seed without a base query is a client error
    /// ([`KindredError::NoMatch`]); an empty text seed without a base
    /// query is a configuration error, since nothing can drive expansion.
    pub fn execute(
        &self,
        reader: &dyn IndexReader,
        request: &FeedbackRequest,
    ) -> Result<ComposedQuery> {
        if request.seed.is_empty() && request.base_query.is_none() {
            return match &request.seed {
                Seed::Documents(_) => Err(KindredError::no_match(
                    "seed resolved to zero documents and no base query was supplied",
                )),
                Seed::Text(_) => Err(KindredError::config(
                    "neither seed text nor a base query available to drive expansion",
                )),
            };
        }

        let expansion = self.expand(reader, &request.seed)?;
        QueryComposer::new(&self.config).compose(
            reader,
            &request.seed,
            &expansion,
            request.base_query.clone(),
        )
    }

    /// Run the self-expansion variant: expand the documents matched by
    /// `seed_query` and use the expansion to re-rank that same result
    /// set. The seed query stays required; no exclusions or constraints
    /// apply.
    pub fn expand_and_rerank(
        &self,
        reader: &dyn IndexReader,
        seed_query: QueryNode,
        matched_ids: &[u64],
    ) -> Result<ComposedQuery> {
        let seed = Seed::documents(matched_ids.to_vec());
        let expansion = self.expand(reader, &seed)?;
        Ok(QueryComposer::new(&self.config).compose_self_expansion(seed_query, &expansion))
    }

    /// Render the ranked terms of a composed query in the configured
    /// explain style.
    pub fn interesting_terms(&self, composed: &ComposedQuery) -> InterestingTerms {
        InterestingTerms::render(self.config.interesting_terms, composed.terms())
    }

    /// Collector → scorer → selector → synthesizer.
    fn expand(&self, reader: &dyn IndexReader, seed: &Seed) -> Result<ExpansionQuery> {
        let collected = TermCollector::new(&self.config).collect(reader, seed)?;
        let scored = TermScorer::new(&self.config, seed.kind()).score_all(reader, &collected)?;
        let selected = TermSelector::new(&self.config).select(scored);
        debug!(
            "expansion over {} terms (seed kind {:?})",
            selected.len(),
            seed.kind()
        );
        Ok(QuerySynthesizer::new(&self.config).synthesize(selected))
    }
}
