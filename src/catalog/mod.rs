//! Cliente del catálogo remoto de cursos.
//!
//! Two query shapes against the catalog service: "which departments offer
//! courses in term X" and "which course numbers does department D teach in
//! term X". Both return loose `{value, text}` records; that shape is
//! resolved here, at the boundary, and never leaks further in.

use std::error::Error;
use std::time::Duration;

use serde::Deserialize;

use crate::models::TermKey;

const DEFAULT_BASE_URL: &str = "http://www.sfu.ca/bin/wcm/course-outlines";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// One record as returned by the catalog service. Either field may carry
/// the payload; `value` is preferred, `text` is the fallback.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRecord {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl ApiRecord {
    /// Resolve the record to its payload, trimming and dropping empties.
    pub fn into_value(self) -> Option<String> {
        self.value
            .or(self.text)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Source of term offerings. The production implementation talks HTTP; tests
/// inject an in-memory stub so no test ever touches the network.
pub trait CourseSource {
    async fn departments(&self, key: TermKey) -> Result<Vec<String>, Box<dyn Error>>;
    async fn course_numbers(&self, key: TermKey, dept: &str) -> Result<Vec<String>, Box<dyn Error>>;
}

/// HTTP client against the real catalog service. Each call carries a bounded
/// timeout; a timed-out call counts as a failure like any other.
pub struct HttpCatalogClient {
    base_url: String,
    timeout: Duration,
}

impl HttpCatalogClient {
    pub fn new(base_url: String, timeout: Duration) -> HttpCatalogClient {
        HttpCatalogClient { base_url, timeout }
    }

    /// Build a client from CATALOG_BASE_URL / CATALOG_TIMEOUT_SECS env vars,
    /// falling back to the public catalog endpoint.
    pub fn from_env() -> HttpCatalogClient {
        let _ = dotenv::dotenv();
        let base_url =
            std::env::var("CATALOG_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let secs = std::env::var("CATALOG_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        HttpCatalogClient::new(base_url, Duration::from_secs(secs))
    }

    async fn get_records(&self, path: &str) -> Result<Vec<ApiRecord>, Box<dyn Error>> {
        let url = format!("{}?{}", self.base_url, path);
        let client = awc::Client::builder().timeout(self.timeout).finish();
        let mut resp = client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| format!("catalog request {} failed: {}", url, e))?;
        if !resp.status().is_success() {
            return Err(format!("catalog request {} returned {}", url, resp.status()).into());
        }
        let records = resp
            .json::<Vec<ApiRecord>>()
            .await
            .map_err(|e| format!("catalog response {} not parseable: {}", url, e))?;
        Ok(records)
    }
}

impl CourseSource for HttpCatalogClient {
    async fn departments(&self, key: TermKey) -> Result<Vec<String>, Box<dyn Error>> {
        let records = self.get_records(&format!("{}/{}", key.year, key.term)).await?;
        Ok(records.into_iter().filter_map(ApiRecord::into_value).collect())
    }

    async fn course_numbers(&self, key: TermKey, dept: &str) -> Result<Vec<String>, Box<dyn Error>> {
        let records = self
            .get_records(&format!("{}/{}/{}", key.year, key.term, dept.to_lowercase()))
            .await?;
        Ok(records.into_iter().filter_map(ApiRecord::into_value).collect())
    }
}

/// Fetch the full offering set for a term: department list first, then one
/// query per department, unioning "DEPT NUMBER" over every department that
/// answered. Per-department failures are logged and skipped; a failed
/// department-list query yields an empty set, never an error, because the
/// caller treats "no offerings" and "catalog unreachable" identically.
pub async fn fetch_offerings<S: CourseSource>(source: &S, key: TermKey) -> Vec<String> {
    let departments = match source.departments(key).await {
        Ok(d) => d,
        Err(e) => {
            log::warn!("catalog: department list for {} unavailable: {}", key, e);
            return Vec::new();
        }
    };

    let mut offerings: Vec<String> = Vec::new();
    for dept in departments {
        match source.course_numbers(key, &dept).await {
            Ok(numbers) => {
                for number in numbers {
                    offerings.push(format!("{} {}", dept.to_uppercase(), number));
                }
            }
            Err(e) => {
                // Partial results are acceptable; one broken department must
                // not sink the whole term.
                log::warn!("catalog: skipping department {} for {}: {}", dept, key, e);
            }
        }
    }

    log::debug!("catalog: {} offerings fetched for {}", offerings.len(), key);
    offerings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_record_prefers_value() {
        let rec: ApiRecord = serde_json::from_str(r#"{"value":"cmpt","text":"Computing"}"#).unwrap();
        assert_eq!(rec.into_value(), Some("cmpt".to_string()));
    }

    #[test]
    fn test_api_record_falls_back_to_text() {
        let rec: ApiRecord = serde_json::from_str(r#"{"text":"Computing"}"#).unwrap();
        assert_eq!(rec.into_value(), Some("Computing".to_string()));
    }

    #[test]
    fn test_api_record_empty_is_none() {
        let rec: ApiRecord = serde_json::from_str(r#"{"value":"  "}"#).unwrap();
        assert_eq!(rec.into_value(), None);
        let rec: ApiRecord = serde_json::from_str(r#"{}"#).unwrap();
        assert!(rec.into_value().is_none());
    }
}
