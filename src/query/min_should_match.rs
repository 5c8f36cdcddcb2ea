//! Minimum-should-match policy for disjunctive queries.
//!
//! The policy mirrors the standard optional-clause threshold: an absolute
//! clause count ("3"), a negative count ("all but 2": "-2"), a percentage
//! of the optional clauses ("75%"), or a negative percentage ("at most
//! 25% may be missing": "-25%"). Percent computations truncate toward
//! zero and the resolved value is clamped to the number of optional
//! clauses. When no policy is set, at least one optional clause must
//! match.

use std::fmt;
use std::str::FromStr;

use crate::error::{KindredError, Result};

/// Minimum-should-match policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinShouldMatch {
    /// No explicit policy: at least one optional clause must match.
    #[default]
    Default,
    /// An absolute clause count; negative means "all but n".
    Absolute(i32),
    /// A percentage of the optional clause count; negative means
    /// "this percentage may be missing".
    Percent(i32),
}

impl MinShouldMatch {
    /// Parse a minimum-should-match expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use kindred::query::MinShouldMatch;
    ///
    /// assert_eq!("3".parse::<MinShouldMatch>().unwrap(), MinShouldMatch::Absolute(3));
    /// assert_eq!("75%".parse::<MinShouldMatch>().unwrap(), MinShouldMatch::Percent(75));
    /// assert_eq!("-25%".parse::<MinShouldMatch>().unwrap(), MinShouldMatch::Percent(-25));
    /// ```
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Ok(MinShouldMatch::Default);
        }

        if let Some(percent) = spec.strip_suffix('%') {
            let value = percent.parse::<i32>().map_err(|_| {
                KindredError::query(format!("invalid minimum-should-match percentage: '{spec}'"))
            })?;
            return Ok(MinShouldMatch::Percent(value));
        }

        let value = spec.parse::<i32>().map_err(|_| {
            KindredError::query(format!("invalid minimum-should-match count: '{spec}'"))
        })?;
        Ok(MinShouldMatch::Absolute(value))
    }

    /// Resolve the policy against the number of optional clauses.
    ///
    /// Returns the number of optional clauses that must match, in
    /// `[0, optional_clauses]`.
    pub fn resolve(&self, optional_clauses: usize) -> usize {
        let n = optional_clauses as i32;
        let raw = match self {
            MinShouldMatch::Default => {
                if n > 0 {
                    1
                } else {
                    0
                }
            }
            MinShouldMatch::Absolute(count) => {
                if *count >= 0 {
                    *count
                } else {
                    n + *count
                }
            }
            // Truncating integer division, matching the standard
            // optional-clause threshold arithmetic.
            MinShouldMatch::Percent(percent) => {
                let portion = n * *percent / 100;
                if *percent >= 0 { portion } else { n + portion }
            }
        };
        raw.clamp(0, n) as usize
    }
}

impl FromStr for MinShouldMatch {
    type Err = KindredError;

    fn from_str(s: &str) -> Result<Self> {
        MinShouldMatch::parse(s)
    }
}

impl fmt::Display for MinShouldMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinShouldMatch::Default => write!(f, ""),
            MinShouldMatch::Absolute(count) => write!(f, "{count}"),
            MinShouldMatch::Percent(percent) => write!(f, "{percent}%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(MinShouldMatch::parse("").unwrap(), MinShouldMatch::Default);
        assert_eq!(
            MinShouldMatch::parse("2").unwrap(),
            MinShouldMatch::Absolute(2)
        );
        assert_eq!(
            MinShouldMatch::parse("-2").unwrap(),
            MinShouldMatch::Absolute(-2)
        );
        assert_eq!(
            MinShouldMatch::parse("100%").unwrap(),
            MinShouldMatch::Percent(100)
        );
        assert_eq!(
            MinShouldMatch::parse(" -25% ").unwrap(),
            MinShouldMatch::Percent(-25)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(MinShouldMatch::parse("abc").is_err());
        assert!(MinShouldMatch::parse("50%%").is_err());
    }

    #[test]
    fn test_resolve_default() {
        assert_eq!(MinShouldMatch::Default.resolve(5), 1);
        assert_eq!(MinShouldMatch::Default.resolve(0), 0);
    }

    #[test]
    fn test_resolve_absolute() {
        assert_eq!(MinShouldMatch::Absolute(3).resolve(5), 3);
        // clamped to the clause count
        assert_eq!(MinShouldMatch::Absolute(9).resolve(5), 5);
        // all but two
        assert_eq!(MinShouldMatch::Absolute(-2).resolve(5), 3);
        assert_eq!(MinShouldMatch::Absolute(-9).resolve(5), 0);
    }

    #[test]
    fn test_resolve_percent() {
        assert_eq!(MinShouldMatch::Percent(100).resolve(4), 4);
        // 75% of 5 truncates to 3
        assert_eq!(MinShouldMatch::Percent(75).resolve(5), 3);
        // 25% of 5 (= 1) may be missing
        assert_eq!(MinShouldMatch::Percent(-25).resolve(5), 4);
        assert_eq!(MinShouldMatch::Percent(0).resolve(5), 0);
    }

    #[test]
    fn test_display_round_trip() {
        for spec in ["3", "-2", "75%", "-25%"] {
            let parsed = MinShouldMatch::parse(spec).unwrap();
            assert_eq!(parsed.to_string(), spec);
        }
    }
}
