//! Expansion query synthesis from ranked terms.
//!
//! Every ranked term becomes one disjunction clause: a plain term match,
//! or a payload-averaged match for fields listed in `rf.payloadfl`. With
//! `rf.boost` on (the default) each clause is wrapped in a weight node
//! carrying the term's final weight; with it off the clauses are emitted
//! unweighted, though ranking and selection still used the weights. The
//! minimum-should-match policy resolves against the clause count.

use ahash::AHashSet;

use crate::feedback::config::FeedbackConfig;
use crate::feedback::term::RankedTerm;
use crate::query::{BooleanQuery, MinShouldMatch, QueryNode};

/// The synthesized weighted disjunction over the selected terms.
///
/// Immutable once built; [`ExpansionQuery::or_query`] renders it as a
/// query tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionQuery {
    terms: Vec<RankedTerm>,
    mm: MinShouldMatch,
    payload_fields: AHashSet<String>,
    boost: bool,
}

impl ExpansionQuery {
    /// The ranked terms, in selection order.
    pub fn terms(&self) -> &[RankedTerm] {
        &self.terms
    }

    /// Check whether the seed produced no qualifying terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Render the OR query over the terms.
    ///
    /// An empty term list yields an empty boolean query, which matches
    /// nothing.
    pub fn or_query(&self) -> QueryNode {
        let mut query = BooleanQuery::new();
        for term in &self.terms {
            query.add_should(self.term_clause(term));
        }
        let msm = self.mm.resolve(query.should_clause_count());
        QueryNode::Boolean(query.with_minimum_should_match(msm))
    }

    fn term_clause(&self, term: &RankedTerm) -> QueryNode {
        let leaf = if self.payload_fields.contains(&term.field) {
            QueryNode::payload_average(&term.field, &term.text)
        } else {
            QueryNode::term(&term.field, &term.text)
        };
        if self.boost {
            QueryNode::boost(leaf, term.weight())
        } else {
            leaf
        }
    }
}

/// Builds expansion queries from selected terms.
pub struct QuerySynthesizer<'a> {
    config: &'a FeedbackConfig,
}

impl<'a> QuerySynthesizer<'a> {
    /// Create a synthesizer over the given configuration.
    pub fn new(config: &'a FeedbackConfig) -> Self {
        QuerySynthesizer { config }
    }

    /// Attach the configured policies to the selected terms.
    pub fn synthesize(&self, terms: Vec<RankedTerm>) -> ExpansionQuery {
        ExpansionQuery {
            terms,
            mm: self.config.mm,
            payload_fields: self.config.payload_fields.clone(),
            boost: self.config.boost,
        }
    }
}
