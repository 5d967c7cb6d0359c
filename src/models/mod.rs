// Estructuras de datos principales

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// The three academic terms, in cycle order. Advancing past `Fall` wraps to
/// `Spring` of the next year (see `TermKey::next`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    Spring,
    Summer,
    Fall,
}

impl Term {
    pub fn as_str(&self) -> &'static str {
        match self {
            Term::Spring => "spring",
            Term::Summer => "summer",
            Term::Fall => "fall",
        }
    }

    /// Capitalized display form ("Spring", "Summer", "Fall").
    pub fn label(&self) -> &'static str {
        match self {
            Term::Spring => "Spring",
            Term::Summer => "Summer",
            Term::Fall => "Fall",
        }
    }

    /// Next term in the fixed annual cycle. Does NOT touch the year; the
    /// caller wraps the year when `Fall` rolls over (see `TermKey::next`).
    pub fn next(&self) -> Term {
        match self {
            Term::Spring => Term::Summer,
            Term::Summer => Term::Fall,
            Term::Fall => Term::Spring,
        }
    }

    /// Term containing a given calendar month (1-12). Jan-Apr spring,
    /// May-Aug summer, Sep-Dec fall.
    pub fn for_month(month: u32) -> Term {
        match month {
            1..=4 => Term::Spring,
            5..=8 => Term::Summer,
            _ => Term::Fall,
        }
    }

    /// Parse a term name. Anything outside the three-term cycle is a hard
    /// configuration error and fails fast instead of producing a wrong
    /// schedule downstream.
    pub fn parse(s: &str) -> Result<Term, Box<dyn Error>> {
        match s.trim().to_lowercase().as_str() {
            "spring" => Ok(Term::Spring),
            "summer" => Ok(Term::Summer),
            "fall" => Ok(Term::Fall),
            other => Err(format!(
                "configuration error: unknown term name '{}' (expected spring|summer|fall)",
                other
            )
            .into()),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One academic term of one academic year, e.g. Fall 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermKey {
    pub year: i32,
    pub term: Term,
}

impl TermKey {
    pub fn new(year: i32, term: Term) -> TermKey {
        TermKey { year, term }
    }

    /// Canonical cache key, lowercase: "2024-fall".
    pub fn key(&self) -> String {
        format!("{}-{}", self.year, self.term.as_str())
    }

    /// Human display form: "Fall 2024".
    pub fn label(&self) -> String {
        format!("{} {}", self.term.label(), self.year)
    }

    /// The term immediately after this one, wrapping the year at the end of
    /// the cycle (fall 2024 -> spring 2025).
    pub fn next(&self) -> TermKey {
        let term = self.term.next();
        let year = if self.term == Term::Fall { self.year + 1 } else { self.year };
        TermKey { year, term }
    }

    /// Same term one year earlier; what the predictor looks up.
    pub fn prior_year(&self) -> TermKey {
        TermKey { year: self.year - 1, term: self.term }
    }

    /// Term containing today's date (UTC).
    pub fn current() -> TermKey {
        let now = chrono::Utc::now();
        TermKey { year: now.year(), term: Term::for_month(now.month()) }
    }
}

impl fmt::Display for TermKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Persisted offering cache document.
///
/// `semesters` maps a term key ("2024-fall") to the course codes known to be
/// offered that term, in original display form. A missing key means "never
/// successfully resolved"; an empty array means "resolved, nothing found".
/// The resolver treats both as a miss when deciding whether to predict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferingCache {
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: String,
    pub semesters: HashMap<String, Vec<String>>,
}

impl OfferingCache {
    pub fn empty() -> OfferingCache {
        OfferingCache {
            last_updated: String::new(),
            semesters: HashMap::new(),
        }
    }
}

/// One scheduled term of a semester plan. Sparse: terms with no assigned
/// course produce no item at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanItem {
    pub year: i32,
    pub term: String,
    pub label: String,
    pub courses: Vec<String>,
    #[serde(rename = "fromPrediction")]
    pub from_prediction: bool,
}

/// Chronologically ordered plan items, one per term that received courses.
pub type SemesterPlan = Vec<PlanItem>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_cycle_wraps_year() {
        let fall = TermKey::new(2024, Term::Fall);
        let next = fall.next();
        assert_eq!(next.year, 2025);
        assert_eq!(next.term, Term::Spring);

        let spring = TermKey::new(2025, Term::Spring);
        assert_eq!(spring.next().year, 2025);
        assert_eq!(spring.next().term, Term::Summer);
    }

    #[test]
    fn test_term_key_forms() {
        let k = TermKey::new(2024, Term::Fall);
        assert_eq!(k.key(), "2024-fall");
        assert_eq!(k.label(), "Fall 2024");
        assert_eq!(k.prior_year().key(), "2023-fall");
    }

    #[test]
    fn test_term_parse_rejects_unknown() {
        assert!(Term::parse("Fall").is_ok());
        assert!(Term::parse(" SPRING ").is_ok());
        let err = Term::parse("winter").unwrap_err();
        assert!(err.to_string().contains("configuration error"));
    }

    #[test]
    fn test_cache_document_shape() {
        let json = r#"{"lastUpdated":"2024-09-01T00:00:00Z","semesters":{"2024-fall":["CMPT 225"]}}"#;
        let cache: OfferingCache = serde_json::from_str(json).unwrap();
        assert_eq!(cache.semesters["2024-fall"], vec!["CMPT 225"]);
        let back = serde_json::to_string(&cache).unwrap();
        assert!(back.contains("lastUpdated"));
    }
}
