// Catálogo en memoria para tests: ninguna prueba toca la red.

use std::collections::HashMap;
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};

use coursepath::catalog::CourseSource;
use coursepath::models::TermKey;

/// In-memory catalog stub: term key -> [(department, course numbers)].
/// Counts department-list calls so tests can assert that a cache hit never
/// re-fetches.
pub struct StubSource {
    terms: HashMap<String, Vec<(String, Vec<String>)>>,
    fail_departments: bool,
    department_calls: AtomicUsize,
}

#[allow(dead_code)]
impl StubSource {
    pub fn new() -> StubSource {
        StubSource {
            terms: HashMap::new(),
            fail_departments: false,
            department_calls: AtomicUsize::new(0),
        }
    }

    /// Stub whose department-list query always fails, like an unreachable
    /// catalog service.
    pub fn unreachable() -> StubSource {
        StubSource {
            terms: HashMap::new(),
            fail_departments: true,
            department_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_term(mut self, key: &str, dept: &str, numbers: &[&str]) -> StubSource {
        self.terms
            .entry(key.to_string())
            .or_default()
            .push((dept.to_string(), numbers.iter().map(|n| n.to_string()).collect()));
        self
    }

    pub fn fetches(&self) -> usize {
        self.department_calls.load(Ordering::SeqCst)
    }
}

impl CourseSource for StubSource {
    async fn departments(&self, key: TermKey) -> Result<Vec<String>, Box<dyn Error>> {
        self.department_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_departments {
            return Err("catalog unreachable".into());
        }
        Ok(self
            .terms
            .get(&key.key())
            .map(|depts| depts.iter().map(|(d, _)| d.clone()).collect())
            .unwrap_or_default())
    }

    async fn course_numbers(&self, key: TermKey, dept: &str) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(self
            .terms
            .get(&key.key())
            .and_then(|depts| depts.iter().find(|(d, _)| d == dept))
            .map(|(_, numbers)| numbers.clone())
            .unwrap_or_default())
    }
}
