//! Per-field ranking and truncation of scored terms.

use log::debug;

use crate::feedback::config::FeedbackConfig;
use crate::feedback::scorer::ScoredTerms;
use crate::feedback::term::RankedTerm;

/// Ranks scored terms and caps them per field.
pub struct TermSelector<'a> {
    config: &'a FeedbackConfig,
}

impl<'a> TermSelector<'a> {
    /// Create a selector over the given configuration.
    pub fn new(config: &'a FeedbackConfig) -> Self {
        TermSelector { config }
    }

    /// Retain the top terms per field and aggregate in selection order.
    ///
    /// Per field the top `rf.maxflqt` terms by descending weight survive,
    /// ties broken by ascending term text. The aggregate is sorted the
    /// same way, which is the order the synthesizer consumes.
    pub fn select(&self, mut scored: ScoredTerms) -> Vec<RankedTerm> {
        let mut selected = Vec::new();
        for (field, terms) in scored.iter_mut() {
            terms.sort_by(RankedTerm::selection_order);
            let cap = self
                .config
                .field_config(field)
                .map(|f| f.max_query_terms)
                .unwrap_or(self.config.max_query_terms_per_field);
            terms.truncate(cap);
            selected.append(terms);
        }
        selected.sort_by(RankedTerm::selection_order);
        debug!("selected {} terms across fields", selected.len());
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashMap;

    fn term(field: &str, text: &str, tf: f32, boost: f32) -> RankedTerm {
        RankedTerm {
            field: field.to_string(),
            text: text.to_string(),
            raw_tf: tf as u64,
            doc_freq: 1,
            tf,
            idf: 1.0,
            field_boost: boost,
            payload: None,
        }
    }

    fn scored(terms: Vec<RankedTerm>) -> ScoredTerms {
        let mut map: ScoredTerms = AHashMap::new();
        for t in terms {
            map.entry(t.field.clone()).or_default().push(t);
        }
        map
    }

    #[test]
    fn test_select_caps_per_field() {
        let mut config = FeedbackConfig::new(vec!["title".into()]);
        config.max_query_terms_per_field = 2;
        let selector = TermSelector::new(&config);

        let selected = selector.select(scored(vec![
            term("title", "a", 1.0, 1.0),
            term("title", "b", 3.0, 1.0),
            term("title", "c", 2.0, 1.0),
        ]));
        let texts: Vec<&str> = selected.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }

    #[test]
    fn test_select_orders_across_fields_by_weight() {
        let config = FeedbackConfig::new(vec!["title".into(), "body".into()]);
        let selector = TermSelector::new(&config);

        // body:big has the highest weight despite the lower field boost
        let selected = selector.select(scored(vec![
            term("title", "small", 1.0, 2.0),
            term("body", "big", 9.0, 1.0),
        ]));
        let labels: Vec<String> = selected.iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["body:big", "title:small"]);
    }

    #[test]
    fn test_select_ties_deterministic() {
        let config = FeedbackConfig::new(vec!["title".into()]);
        let selector = TermSelector::new(&config);

        let forward = selector.select(scored(vec![
            term("title", "beta", 1.0, 1.0),
            term("title", "alpha", 1.0, 1.0),
        ]));
        let reverse = selector.select(scored(vec![
            term("title", "alpha", 1.0, 1.0),
            term("title", "beta", 1.0, 1.0),
        ]));
        assert_eq!(forward, reverse);
        assert_eq!(forward[0].text, "alpha");
    }

    #[test]
    fn test_select_empty() {
        let config = FeedbackConfig::new(vec!["title".into()]);
        let selector = TermSelector::new(&config);
        assert!(selector.select(ScoredTerms::new()).is_empty());
    }
}
