//! Closed query AST produced by the feedback pipeline.
//!
//! The variants cover exactly what query composition needs: leaf term
//! matches (plain or payload-averaged), constant score scaling, boolean
//! composition with per-clause occurrence, and host-evaluated function
//! boosting. The tree is immutable once built and compares structurally,
//! which the determinism tests rely on.
//!
//! # Examples
//!
//! ```
//! use kindred::query::{BooleanQuery, Occur, QueryNode};
//!
//! let mut query = BooleanQuery::new();
//! query.add_should(QueryNode::boost(QueryNode::term("title", "rust"), 2.0));
//! query.add_must_not(QueryNode::term("id", "doc1"));
//!
//! let node = QueryNode::Boolean(query);
//! assert_eq!(node.to_string(), "((title:rust)^2 -id:doc1)");
//! ```

use std::fmt;

/// Occurrence requirements for boolean clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    /// The clause must match (equivalent to AND).
    Must,
    /// The clause should match (equivalent to OR).
    Should,
    /// The clause must not match (equivalent to NOT).
    MustNot,
    /// The clause must match but does not contribute to the score.
    Filter,
}

/// A clause in a boolean query.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanClause {
    /// The query for this clause.
    pub query: QueryNode,
    /// The occurrence requirement.
    pub occur: Occur,
}

impl BooleanClause {
    /// Create a new boolean clause.
    pub fn new(query: QueryNode, occur: Occur) -> Self {
        BooleanClause { query, occur }
    }

    /// Create a MUST clause.
    pub fn must(query: QueryNode) -> Self {
        BooleanClause::new(query, Occur::Must)
    }

    /// Create a SHOULD clause.
    pub fn should(query: QueryNode) -> Self {
        BooleanClause::new(query, Occur::Should)
    }

    /// Create a MUST_NOT clause.
    pub fn must_not(query: QueryNode) -> Self {
        BooleanClause::new(query, Occur::MustNot)
    }

    /// Create a FILTER clause.
    pub fn filter(query: QueryNode) -> Self {
        BooleanClause::new(query, Occur::Filter)
    }
}

/// A boolean query that combines multiple sub-queries with boolean logic.
///
/// An empty boolean query matches nothing, which is also the shape of the
/// expansion query when the seed produced no qualifying terms.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BooleanQuery {
    /// The clauses in this boolean query.
    clauses: Vec<BooleanClause>,
    /// Minimum number of SHOULD clauses that must match.
    minimum_should_match: usize,
}

impl BooleanQuery {
    /// Create a new empty boolean query.
    pub fn new() -> Self {
        BooleanQuery {
            clauses: Vec::new(),
            minimum_should_match: 0,
        }
    }

    /// Add a clause to this boolean query.
    pub fn add_clause(&mut self, clause: BooleanClause) {
        self.clauses.push(clause);
    }

    /// Add a MUST clause.
    pub fn add_must(&mut self, query: QueryNode) {
        self.add_clause(BooleanClause::must(query));
    }

    /// Add a SHOULD clause.
    pub fn add_should(&mut self, query: QueryNode) {
        self.add_clause(BooleanClause::should(query));
    }

    /// Add a MUST_NOT clause.
    pub fn add_must_not(&mut self, query: QueryNode) {
        self.add_clause(BooleanClause::must_not(query));
    }

    /// Add a FILTER clause.
    pub fn add_filter(&mut self, query: QueryNode) {
        self.add_clause(BooleanClause::filter(query));
    }

    /// Set the minimum number of SHOULD clauses that must match.
    pub fn with_minimum_should_match(mut self, minimum: usize) -> Self {
        self.minimum_should_match = minimum;
        self
    }

    /// Get the clauses.
    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }

    /// Get the minimum number of SHOULD clauses that must match.
    pub fn minimum_should_match(&self) -> usize {
        self.minimum_should_match
    }

    /// Check if this query has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Count the SHOULD clauses in this query.
    pub fn should_clause_count(&self) -> usize {
        self.clauses
            .iter()
            .filter(|c| c.occur == Occur::Should)
            .count()
    }
}

impl fmt::Display for BooleanQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match clause.occur {
                Occur::Must => write!(f, "+{}", clause.query)?,
                Occur::Should => write!(f, "{}", clause.query)?,
                Occur::MustNot => write!(f, "-{}", clause.query)?,
                Occur::Filter => write!(f, "#{}", clause.query)?,
            }
        }
        write!(f, ")")?;
        if self.minimum_should_match > 0 {
            write!(f, "~{}", self.minimum_should_match)?;
        }
        Ok(())
    }
}

/// A node in the query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    /// Exact term match on a field.
    Term {
        /// The field to match against.
        field: String,
        /// The term text.
        text: String,
    },
    /// Term match whose raw score is the mean of per-occurrence payloads.
    PayloadAverage {
        /// The field to match against.
        field: String,
        /// The term text.
        text: String,
    },
    /// Multiplies the inner query's score by a constant weight.
    Boost {
        /// The wrapped query.
        query: Box<QueryNode>,
        /// The constant score multiplier.
        weight: f32,
    },
    /// Boolean composition of sub-queries.
    Boolean(BooleanQuery),
    /// Scales the inner query by a host-evaluated function expression.
    ///
    /// The expression is carried opaquely; the host engine parses and
    /// evaluates it at translation time.
    FunctionBoost {
        /// The wrapped query.
        query: Box<QueryNode>,
        /// The function expression, in the host engine's syntax.
        expression: String,
    },
}

impl QueryNode {
    /// Create a term query node.
    pub fn term<F: Into<String>, T: Into<String>>(field: F, text: T) -> Self {
        QueryNode::Term {
            field: field.into(),
            text: text.into(),
        }
    }

    /// Create a payload-averaged term query node.
    pub fn payload_average<F: Into<String>, T: Into<String>>(field: F, text: T) -> Self {
        QueryNode::PayloadAverage {
            field: field.into(),
            text: text.into(),
        }
    }

    /// Wrap a query in a constant score boost.
    pub fn boost(query: QueryNode, weight: f32) -> Self {
        QueryNode::Boost {
            query: Box::new(query),
            weight,
        }
    }

    /// Wrap a query in a function boost.
    pub fn function_boost<E: Into<String>>(query: QueryNode, expression: E) -> Self {
        QueryNode::FunctionBoost {
            query: Box::new(query),
            expression: expression.into(),
        }
    }

    /// Create a query that matches nothing.
    pub fn match_nothing() -> Self {
        QueryNode::Boolean(BooleanQuery::new())
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryNode::Term { field, text } => write!(f, "{field}:{text}"),
            QueryNode::PayloadAverage { field, text } => write!(f, "payload({field}:{text})"),
            QueryNode::Boost { query, weight } => write!(f, "({query})^{weight}"),
            QueryNode::Boolean(boolean) => write!(f, "{boolean}"),
            QueryNode::FunctionBoost { query, expression } => {
                write!(f, "boost({query},{expression})")
            }
        }
    }
}
