//! Typed configuration for the feedback pipeline.

use ahash::{AHashMap, AHashSet};

use crate::error::{KindredError, Result};
use crate::feedback::params::{self, TermStyle};
use crate::feedback::seed::{Seed, SeedKind, TextSection};
use crate::query::MinShouldMatch;

/// Configuration of the whole pipeline, parsed from flat parameters.
///
/// # Examples
///
/// ```
/// use kindred::feedback::config::FeedbackConfig;
///
/// let config = FeedbackConfig::new(vec!["title".into(), "body".into()]);
/// assert_eq!(config.max_query_terms_per_field, 25);
/// ```
#[derive(Debug, Clone)]
pub struct FeedbackConfig {
    /// Similarity fields terms are collected from. At least one required.
    pub fields: Vec<String>,
    /// Terms with a lower accumulated frequency are ignored.
    pub min_term_freq: u64,
    /// Terms appearing in fewer documents are ignored (too rare is noise).
    pub min_doc_freq: u64,
    /// Terms appearing in more documents are ignored (non-discriminating).
    pub max_doc_freq: u64,
    /// Tokens with fewer characters are ignored (0 disables).
    pub min_word_len: usize,
    /// Tokens with more characters are ignored (0 disables).
    pub max_word_len: usize,
    /// Upper bound on terms retained per field after ranking.
    pub max_query_terms_per_field: usize,
    /// Upper bound on tokens read per (document, field) or (section, field).
    pub max_tokens_parsed_per_field: usize,
    /// Minimum-should-match policy of the expansion query.
    pub mm: MinShouldMatch,
    /// Whether expansion clauses carry their computed weights.
    pub boost: bool,
    /// Whether field boosts are rescaled to sum to 1.0.
    pub normalize_field_boosts: bool,
    /// Whether the term-frequency component is `ln(1 + tf)`.
    pub log_tf: bool,
    /// Field-boost table for document seeds (`rf.qf`).
    pub boost_fields: AHashMap<String, f32>,
    /// Field-boost table for content-stream seeds (`stream.qf`).
    pub stream_boost_fields: AHashMap<String, f32>,
    /// Fields on which results must equal the seed documents' values.
    pub match_fields: Vec<String>,
    /// Fields on which results must differ from the seed documents' values.
    pub different_fields: Vec<String>,
    /// Fields whose clauses score by mean payload value.
    pub payload_fields: AHashSet<String>,
    /// Optional boost-function expression, carried opaquely.
    pub boost_fn: Option<String>,
    /// Target fields for the head section of a content stream.
    pub stream_head_fields: Option<Vec<String>>,
    /// Target fields for the body section of a content stream.
    /// Defaults to the similarity fields.
    pub stream_body_fields: Option<Vec<String>>,
    /// Requested explain style for the ranked term list.
    pub interesting_terms: TermStyle,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        FeedbackConfig {
            fields: Vec::new(),
            min_term_freq: 1,
            min_doc_freq: 5,
            max_doc_freq: u64::MAX,
            min_word_len: 0,
            max_word_len: 0,
            max_query_terms_per_field: 25,
            max_tokens_parsed_per_field: 5000,
            mm: MinShouldMatch::Default,
            boost: true,
            normalize_field_boosts: true,
            log_tf: false,
            boost_fields: AHashMap::new(),
            stream_boost_fields: AHashMap::new(),
            match_fields: Vec::new(),
            different_fields: Vec::new(),
            payload_fields: AHashSet::new(),
            boost_fn: None,
            stream_head_fields: None,
            stream_body_fields: None,
            interesting_terms: TermStyle::None,
        }
    }
}

impl FeedbackConfig {
    /// Create a configuration with defaults for the given similarity fields.
    pub fn new(fields: Vec<String>) -> Self {
        FeedbackConfig {
            fields,
            ..Default::default()
        }
    }

    /// Parse a configuration from a flat parameter map.
    ///
    /// Fails fast on the first malformed value, naming the offending key.
    pub fn from_params(params: &AHashMap<String, String>) -> Result<Self> {
        let mut config = FeedbackConfig::default();

        let fields = params
            .get(params::SIMILARITY_FIELDS)
            .map(|value| params::split_list(value))
            .unwrap_or_default();
        if fields.is_empty() {
            return Err(KindredError::config(format!(
                "at least one similarity field is required: {}",
                params::SIMILARITY_FIELDS
            )));
        }
        config.fields = fields;

        if let Some(value) = params.get(params::MIN_TERM_FREQ) {
            config.min_term_freq = params::parse_int(params::MIN_TERM_FREQ, value)?;
        }
        if let Some(value) = params.get(params::MIN_DOC_FREQ) {
            config.min_doc_freq = params::parse_int(params::MIN_DOC_FREQ, value)?;
        }
        if let Some(value) = params.get(params::MAX_DOC_FREQ) {
            config.max_doc_freq = params::parse_int(params::MAX_DOC_FREQ, value)?;
        }
        if let Some(value) = params.get(params::MIN_WORD_LEN) {
            config.min_word_len = params::parse_int(params::MIN_WORD_LEN, value)? as usize;
        }
        if let Some(value) = params.get(params::MAX_WORD_LEN) {
            config.max_word_len = params::parse_int(params::MAX_WORD_LEN, value)? as usize;
        }
        if let Some(value) = params.get(params::MAX_QUERY_TERMS_PER_FIELD) {
            config.max_query_terms_per_field =
                params::parse_int(params::MAX_QUERY_TERMS_PER_FIELD, value)? as usize;
        }
        if let Some(value) = params.get(params::MAX_NUM_TOKENS_PARSED_PER_FIELD) {
            config.max_tokens_parsed_per_field =
                params::parse_int(params::MAX_NUM_TOKENS_PARSED_PER_FIELD, value)? as usize;
        }
        if let Some(value) = params.get(params::MM) {
            config.mm = MinShouldMatch::parse(value)
                .map_err(|e| KindredError::config(format!("{}: {e}", params::MM)))?;
        }
        if let Some(value) = params.get(params::BOOST) {
            config.boost = params::parse_bool(params::BOOST, value)?;
        }
        if let Some(value) = params.get(params::NORMALIZE_FIELD_BOOSTS) {
            config.normalize_field_boosts =
                params::parse_bool(params::NORMALIZE_FIELD_BOOSTS, value)?;
        }
        if let Some(value) = params.get(params::IS_LOG_TF) {
            config.log_tf = params::parse_bool(params::IS_LOG_TF, value)?;
        }
        if let Some(value) = params.get(params::QF) {
            config.boost_fields = params::parse_field_boosts(params::QF, value)?;
        }
        if let Some(value) = params.get(params::STREAM_QF) {
            config.stream_boost_fields = params::parse_field_boosts(params::STREAM_QF, value)?;
        }
        if let Some(value) = params.get(params::FL_MUST_MATCH) {
            config.match_fields = params::split_list(value);
        }
        if let Some(value) = params.get(params::FL_MUST_NOT_MATCH) {
            config.different_fields = params::split_list(value);
        }
        if let Some(value) = params.get(params::PAYLOAD_FIELDS) {
            config.payload_fields = params::split_list(value).into_iter().collect();
        }
        if let Some(value) = params.get(params::BOOST_FN) {
            if !value.trim().is_empty() {
                config.boost_fn = Some(value.trim().to_string());
            }
        }
        if let Some(value) = params.get(params::STREAM_HEAD_FL) {
            config.stream_head_fields = Some(params::split_list(value));
        }
        if let Some(value) = params.get(params::STREAM_BODY_FL) {
            config.stream_body_fields = Some(params::split_list(value));
        }
        if let Some(value) = params.get(params::INTERESTING_TERMS) {
            config.interesting_terms = TermStyle::parse(value);
        }

        Ok(config)
    }

    /// Check whether a field is one of the configured similarity fields.
    pub fn is_similarity_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Materialize the per-field configuration for a similarity field.
    pub fn field_config(&self, field: &str) -> Option<FieldConfig> {
        if !self.is_similarity_field(field) {
            return None;
        }
        Some(FieldConfig {
            name: field.to_string(),
            boost: self.boost_fields.get(field).copied().unwrap_or(1.0),
            stream_boost: self.stream_boost_fields.get(field).copied().unwrap_or(1.0),
            min_word_len: self.min_word_len,
            max_word_len: self.max_word_len,
            max_tokens_parsed: self.max_tokens_parsed_per_field,
            max_query_terms: self.max_query_terms_per_field,
        })
    }

    /// Materialize the per-field configuration for every similarity field.
    pub fn field_configs(&self) -> Vec<FieldConfig> {
        self.fields
            .iter()
            .filter_map(|field| self.field_config(field))
            .collect()
    }

    /// Effective boost per similarity field for the given seed kind.
    ///
    /// Fields absent from the boost table default to 1.0. With
    /// normalization enabled the boosts are rescaled to sum to 1.0 across
    /// the configured fields, so no field dominates purely through scale.
    pub fn effective_field_boosts(&self, kind: SeedKind) -> AHashMap<String, f32> {
        let table = match kind {
            SeedKind::Documents => &self.boost_fields,
            SeedKind::Stream => &self.stream_boost_fields,
        };
        let mut boosts: AHashMap<String, f32> = self
            .fields
            .iter()
            .map(|field| (field.clone(), table.get(field).copied().unwrap_or(1.0)))
            .collect();
        if self.normalize_field_boosts {
            let sum: f32 = boosts.values().sum();
            if sum > 0.0 {
                for boost in boosts.values_mut() {
                    *boost /= sum;
                }
            }
        }
        boosts
    }

    /// Build a content-stream seed from head and body text.
    ///
    /// The head targets `stream.head.fl` (nothing when unset); the body
    /// targets `stream.body.fl`, defaulting to the similarity fields.
    pub fn stream_seed(&self, head: Option<&str>, body: &str) -> Seed {
        let mut sections = Vec::new();
        if let (Some(head), Some(fields)) = (head, &self.stream_head_fields) {
            sections.push(TextSection::new(head, fields.clone()));
        }
        let body_fields = self
            .stream_body_fields
            .clone()
            .unwrap_or_else(|| self.fields.clone());
        sections.push(TextSection::new(body, body_fields));
        Seed::Text(sections)
    }

    /// Validate the configuration invariants.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(KindredError::config(format!(
                "at least one similarity field is required: {}",
                params::SIMILARITY_FIELDS
            )));
        }
        Ok(())
    }
}

/// Per-field view of the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Field name.
    pub name: String,
    /// Raw boost from the primary table (`rf.qf`).
    pub boost: f32,
    /// Raw boost from the stream table (`stream.qf`).
    pub stream_boost: f32,
    /// Minimum token character count (0 disables).
    pub min_word_len: usize,
    /// Maximum token character count (0 disables).
    pub max_word_len: usize,
    /// Token budget per (document, field) or (section, field).
    pub max_tokens_parsed: usize,
    /// Upper bound on retained query terms for this field.
    pub max_query_terms: usize,
}

impl FieldConfig {
    /// Check a token against the word-length bounds.
    pub fn accepts_word(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        let len = word.chars().count();
        if self.min_word_len > 0 && len < self.min_word_len {
            return false;
        }
        if self.max_word_len > 0 && len > self.max_word_len {
            return false;
        }
        true
    }
}
