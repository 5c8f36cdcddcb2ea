//! Flat parameter surface for the feedback pipeline.
//!
//! Parameter keys follow the original request-handler convention: the
//! `rf.` prefix for feedback parameters, `stream.*` for content-stream
//! parameters. [`crate::feedback::config::FeedbackConfig::from_params`]
//! turns a parsed parameter map into a typed configuration, failing fast
//! with a message that names the offending key.

use ahash::AHashMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{KindredError, Result};

/// Parameter key prefix.
pub const PREFIX: &str = "rf.";

/// Similarity field list (comma or space separated). Required.
pub const SIMILARITY_FIELDS: &str = "rf.fl";
/// Minimum term frequency below which terms are ignored.
pub const MIN_TERM_FREQ: &str = "rf.mintf";
/// Minimum document frequency below which terms are ignored.
pub const MIN_DOC_FREQ: &str = "rf.mindf";
/// Maximum document frequency above which terms are ignored.
pub const MAX_DOC_FREQ: &str = "rf.maxdf";
/// Minimum word length below which tokens are ignored (0 disables).
pub const MIN_WORD_LEN: &str = "rf.minwl";
/// Maximum word length above which tokens are ignored (0 disables).
pub const MAX_WORD_LEN: &str = "rf.maxwl";
/// Minimum-should-match expression for the expansion query.
pub const MM: &str = "rf.mm";
/// Maximum number of query terms retained per field.
pub const MAX_QUERY_TERMS_PER_FIELD: &str = "rf.maxflqt";
/// Maximum number of tokens parsed per field.
pub const MAX_NUM_TOKENS_PARSED_PER_FIELD: &str = "rf.maxflntp";
/// Whether expansion clauses carry their computed weights.
pub const BOOST: &str = "rf.boost";
/// Primary field-boost table (`field^boost` entries).
pub const QF: &str = "rf.qf";
/// Fields that must match the seed documents' values.
pub const FL_MUST_MATCH: &str = "rf.fl.match";
/// Fields that must differ from the seed documents' values.
pub const FL_MUST_NOT_MATCH: &str = "rf.fl.different";
/// Boost-function expression wrapped around the composed query.
pub const BOOST_FN: &str = "rf.boostfn";
/// Fields whose clauses score by mean payload value.
pub const PAYLOAD_FIELDS: &str = "rf.payloadfl";
/// Whether field boosts are normalized to sum to 1.0.
pub const NORMALIZE_FIELD_BOOSTS: &str = "rf.normflboosts";
/// Whether term frequency is log-scaled.
pub const IS_LOG_TF: &str = "rf.logtf";
/// Explain style for the ranked term list.
pub const INTERESTING_TERMS: &str = "rf.interestingTerms";

/// Field-boost table applied to content-stream seeds.
pub const STREAM_QF: &str = "stream.qf";
/// Target fields for the head section of a content-stream seed.
pub const STREAM_HEAD_FL: &str = "stream.head.fl";
/// Target fields for the body section of a content-stream seed.
pub const STREAM_BODY_FL: &str = "stream.body.fl";

lazy_static! {
    // Shared with every list-valued parameter; built once, read-only.
    static ref SPLIT_LIST: Regex = Regex::new(",| ").unwrap();
}

/// Split a comma- or space-separated parameter value into entries.
pub fn split_list(value: &str) -> Vec<String> {
    SPLIT_LIST
        .split(value.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}

/// Parse a `field^boost field^boost …` table.
///
/// Entries without a `^boost` suffix get boost 1.0. The `key` is used in
/// error messages only.
pub fn parse_field_boosts(key: &str, value: &str) -> Result<AHashMap<String, f32>> {
    let mut boosts = AHashMap::new();
    for entry in split_list(value) {
        match entry.split_once('^') {
            Some((field, boost)) => {
                let boost: f32 = boost.parse().map_err(|_| {
                    KindredError::config(format!("{key}: invalid boost in '{entry}'"))
                })?;
                boosts.insert(field.to_string(), boost);
            }
            None => {
                boosts.insert(entry, 1.0);
            }
        }
    }
    Ok(boosts)
}

/// Parse an integer-valued parameter, naming the key on failure.
pub fn parse_int(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| KindredError::config(format!("{key}: expected a non-negative integer, got '{value}'")))
}

/// Parse a boolean-valued parameter, naming the key on failure.
pub fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "true" | "on" | "yes" => Ok(true),
        "false" | "off" | "no" => Ok(false),
        _ => Err(KindredError::config(format!(
            "{key}: expected a boolean, got '{value}'"
        ))),
    }
}

/// Requested explain style for the ranked term list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermStyle {
    /// No term output.
    #[default]
    None,
    /// Compact ordered term list.
    List,
    /// Detailed term and weight listing.
    Details,
}

impl TermStyle {
    /// Parse the `rf.interestingTerms` parameter value.
    ///
    /// `list` and `true` select the compact list, `details` the detailed
    /// listing; anything else selects no output.
    pub fn parse(value: &str) -> TermStyle {
        match value.trim().to_ascii_lowercase().as_str() {
            "details" => TermStyle::Details,
            "list" | "true" => TermStyle::List,
            _ => TermStyle::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("title,body"), vec!["title", "body"]);
        assert_eq!(split_list("  title body "), vec!["title", "body"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_parse_field_boosts() {
        let boosts = parse_field_boosts(QF, "title^2.0 body").unwrap();
        assert_eq!(boosts.get("title"), Some(&2.0));
        assert_eq!(boosts.get("body"), Some(&1.0));
    }

    #[test]
    fn test_parse_field_boosts_rejects_bad_boost() {
        let err = parse_field_boosts(QF, "title^abc").unwrap_err();
        assert!(err.to_string().contains("rf.qf"));
    }

    #[test]
    fn test_parse_int_names_key() {
        let err = parse_int(MIN_TERM_FREQ, "two").unwrap_err();
        assert!(err.to_string().contains("rf.mintf"));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool(BOOST, "true").unwrap());
        assert!(!parse_bool(BOOST, "off").unwrap());
        assert!(parse_bool(BOOST, "maybe").is_err());
    }

    #[test]
    fn test_term_style() {
        assert_eq!(TermStyle::parse("details"), TermStyle::Details);
        assert_eq!(TermStyle::parse("LIST"), TermStyle::List);
        assert_eq!(TermStyle::parse("true"), TermStyle::List);
        assert_eq!(TermStyle::parse("false"), TermStyle::None);
        assert_eq!(TermStyle::parse(""), TermStyle::None);
    }
}
