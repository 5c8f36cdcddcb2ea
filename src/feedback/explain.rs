//! Explainable views of the ranked term list.
//!
//! Three renderings, matching the `rf.interestingTerms` styles: nothing,
//! a compact ordered label list, or a detailed term/weight listing. The
//! debug table is a padded field → term → score-components rendering in
//! display order, independent of the requested style.

use std::fmt::Write as _;

use serde::Serialize;

use crate::feedback::params::TermStyle;
use crate::feedback::term::RankedTerm;

/// A term and its final weight, for the detailed listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermDetail {
    /// Qualified `field:text` label.
    pub term: String,
    /// Final weight of the term.
    pub weight: f32,
}

/// The ranked term list rendered in one of the explain styles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InterestingTerms {
    /// No term output requested.
    None,
    /// Compact term labels in selection order.
    List(Vec<String>),
    /// Term labels with weights, sorted by descending weight.
    Details(Vec<TermDetail>),
}

impl InterestingTerms {
    /// Render the terms in the requested style.
    ///
    /// Terms are expected in selection order, which is already descending
    /// by weight.
    pub fn render(style: TermStyle, terms: &[RankedTerm]) -> InterestingTerms {
        match style {
            TermStyle::None => InterestingTerms::None,
            TermStyle::List => {
                InterestingTerms::List(terms.iter().map(|t| t.label()).collect())
            }
            TermStyle::Details => InterestingTerms::Details(
                terms
                    .iter()
                    .map(|t| TermDetail {
                        term: t.label(),
                        weight: t.weight(),
                    })
                    .collect(),
            ),
        }
    }
}

/// Render a padded per-field debug table of the score components.
///
/// Terms appear in display order (field, then term text, ascending), so
/// the output is stable across runs.
pub fn debug_table(terms: &[RankedTerm]) -> String {
    let mut sorted = terms.to_vec();
    sorted.sort_by(RankedTerm::display_order);

    let term_width = sorted.iter().map(|t| t.text.len()).max().unwrap_or(0);

    let mut out = String::new();
    let mut current_field: Option<&str> = None;
    for term in &sorted {
        if current_field != Some(term.field.as_str()) {
            current_field = Some(term.field.as_str());
            let _ = writeln!(out, "field: {}", term.field);
        }
        let _ = writeln!(
            out,
            "  {:term_width$}  tf={} df={} tfc={:.3} idf={:.3} boost={:.3} weight={:.3}",
            term.text,
            term.raw_tf,
            term.doc_freq,
            term.tf,
            term.idf,
            term.field_boost,
            term.weight(),
        );
    }
    out
}
