use crate::analithics::db::{analytics_db_path, record_cache_stats};
use crate::offerings::cache_counters;
use chrono::Utc;
use rusqlite::{Connection, params};
use std::error::Error;

/// Insert a planning-query row into the analytics DB. Parses the request
/// best-effort to fill the structured columns; opens a short-lived
/// connection and inserts the row.
pub fn log_query(
    request_json: &str,
    response_json: &str,
    duration_ms: i64,
    client_ip: &str,
) -> Result<(), Box<dyn Error>> {
    let conn = Connection::open(analytics_db_path())?;
    let ts = Utc::now().to_rfc3339();

    // best-effort parse of the structured columns
    let parsed: serde_json::Value = serde_json::from_str(request_json).unwrap_or_default();
    let email = parsed.get("email").and_then(|v| v.as_str()).unwrap_or("").to_string();
    let capacity = parsed.get("per_term_capacity").and_then(|v| v.as_i64());
    let completed_json = parsed.get("completed").map(|v| v.to_string());
    let desired_json = parsed.get("desired").map(|v| v.to_string());

    conn.execute(
        "INSERT INTO queries (
            ts, duration_ms, email, capacity,
            completed_json, desired_json,
            request_json, response_json, client_ip
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            ts,
            duration_ms,
            email,
            capacity,
            completed_json,
            desired_json,
            request_json,
            response_json,
            client_ip,
        ],
    )?;
    Ok(())
}

/// Snapshot the resolver's hit/miss counters plus the number of cached term
/// entries into cache_stats.
pub fn record_cache_snapshot(entries: i64) -> Result<(), Box<dyn Error>> {
    let (hits, misses) = cache_counters();
    let ts = Utc::now().to_rfc3339();
    record_cache_stats(&ts, hits, misses, entries)
}
