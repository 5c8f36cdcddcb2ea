//! Final query composition.
//!
//! Takes the synthesized expansion and layers on, in order: required
//! absences for the seed documents (so seeds never reappear in results),
//! must-match/must-differ constraint filters, the optional boost-function
//! wrapper, and the optional base query. The result carries the ranked
//! term list alongside the query tree for explain output.

use log::debug;

use crate::error::{KindredError, Result};
use crate::feedback::config::FeedbackConfig;
use crate::feedback::params;
use crate::feedback::seed::Seed;
use crate::feedback::synthesizer::ExpansionQuery;
use crate::feedback::term::RankedTerm;
use crate::index::IndexReader;
use crate::query::{BooleanQuery, QueryNode};

/// The final composed query plus the explainable term list.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedQuery {
    query: QueryNode,
    terms: Vec<RankedTerm>,
}

impl ComposedQuery {
    /// The query tree to hand to the host engine.
    pub fn query(&self) -> &QueryNode {
        &self.query
    }

    /// The ranked terms behind the expansion, in selection order.
    pub fn terms(&self) -> &[RankedTerm] {
        &self.terms
    }

    /// Decompose into the query tree and the term list.
    pub fn into_parts(self) -> (QueryNode, Vec<RankedTerm>) {
        (self.query, self.terms)
    }
}

/// Composes expansion queries with exclusions, constraints, and boosts.
pub struct QueryComposer<'a> {
    config: &'a FeedbackConfig,
}

impl<'a> QueryComposer<'a> {
    /// Create a composer over the given configuration.
    pub fn new(config: &'a FeedbackConfig) -> Self {
        QueryComposer { config }
    }

    /// Compose the final query for a seed-driven request.
    ///
    /// With a base query supplied the base gates membership (REQUIRED)
    /// and the boosted expansion re-ranks (OPTIONAL); otherwise the
    /// boosted expansion stands alone.
    pub fn compose(
        &self,
        reader: &dyn IndexReader,
        seed: &Seed,
        expansion: &ExpansionQuery,
        base_query: Option<QueryNode>,
    ) -> Result<ComposedQuery> {
        let core = match seed {
            Seed::Documents(doc_ids) => {
                let mut query = BooleanQuery::new();
                query.add_must(expansion.or_query());
                self.add_seed_exclusions(reader, doc_ids, &mut query)?;
                self.add_constraints(reader, doc_ids, &mut query)?;
                QueryNode::Boolean(query)
            }
            Seed::Text(_) => {
                if !self.config.match_fields.is_empty() || !self.config.different_fields.is_empty()
                {
                    return Err(KindredError::config(format!(
                        "the {} and the {} parameters are not supported for content stream queries",
                        params::FL_MUST_MATCH,
                        params::FL_MUST_NOT_MATCH
                    )));
                }
                expansion.or_query()
            }
        };

        let boosted = self.apply_boost_fn(core);
        let query = match base_query {
            Some(base) => {
                let mut personalized = BooleanQuery::new();
                personalized.add_must(base);
                personalized.add_should(boosted);
                QueryNode::Boolean(personalized)
            }
            None => boosted,
        };

        debug!("composed query: {query}");
        Ok(ComposedQuery {
            query,
            terms: expansion.terms().to_vec(),
        })
    }

    /// Compose the self-expansion variant: the original query stays
    /// REQUIRED and the expansion built from its own matches re-ranks the
    /// same result set. No seed exclusions or constraints apply; the
    /// boost function wraps the combined query.
    pub fn compose_self_expansion(
        &self,
        seed_query: QueryNode,
        expansion: &ExpansionQuery,
    ) -> ComposedQuery {
        let mut combined = BooleanQuery::new();
        combined.add_must(seed_query);
        combined.add_should(expansion.or_query());

        let query = self.apply_boost_fn(QueryNode::Boolean(combined));
        debug!("composed self-expansion query: {query}");
        ComposedQuery {
            query,
            terms: expansion.terms().to_vec(),
        }
    }

    /// Add a required-absence clause per seed document, keyed on the
    /// unique-key value, so seeds cannot reappear in results.
    fn add_seed_exclusions(
        &self,
        reader: &dyn IndexReader,
        doc_ids: &[u64],
        query: &mut BooleanQuery,
    ) -> Result<()> {
        let key_field = reader.unique_key_field().to_string();
        for &doc_id in doc_ids {
            let values = reader.stored_values(doc_id, &key_field)?;
            let key = values.into_iter().next().ok_or_else(|| {
                KindredError::index(format!(
                    "seed document {doc_id} has no value for unique key field '{key_field}'"
                ))
            })?;
            query.add_must_not(QueryNode::term(&key_field, key));
        }
        Ok(())
    }

    /// Add must-match and must-differ constraint filters relative to the
    /// seed documents' stored values.
    fn add_constraints(
        &self,
        reader: &dyn IndexReader,
        doc_ids: &[u64],
        query: &mut BooleanQuery,
    ) -> Result<()> {
        for field in &self.config.match_fields {
            let values = self.seed_values(reader, doc_ids, field)?;
            if values.is_empty() {
                continue;
            }
            let mut any_of = BooleanQuery::new();
            for value in values {
                any_of.add_should(QueryNode::term(field, value));
            }
            query.add_filter(QueryNode::Boolean(any_of.with_minimum_should_match(1)));
        }

        for field in &self.config.different_fields {
            let values = self.seed_values(reader, doc_ids, field)?;
            if values.is_empty() {
                continue;
            }
            let mut none_of = BooleanQuery::new();
            for value in values {
                none_of.add_must_not(QueryNode::term(field, value));
            }
            query.add_filter(QueryNode::Boolean(none_of));
        }
        Ok(())
    }

    /// Gather a field's stored values across the seed documents,
    /// deduplicated and sorted for determinism.
    fn seed_values(
        &self,
        reader: &dyn IndexReader,
        doc_ids: &[u64],
        field: &str,
    ) -> Result<Vec<String>> {
        let mut values = Vec::new();
        for &doc_id in doc_ids {
            values.extend(reader.stored_values(doc_id, field)?);
        }
        values.sort();
        values.dedup();
        Ok(values)
    }

    fn apply_boost_fn(&self, query: QueryNode) -> QueryNode {
        match &self.config.boost_fn {
            Some(expression) => QueryNode::function_boost(query, expression),
            None => query,
        }
    }
}
