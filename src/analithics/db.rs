use rusqlite::{Connection, params};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

// load .env at module init if present
fn load_dotenv() {
    let _ = dotenv::dotenv();
}

/// Return the path to the analytics DB. Honors ANALITHICS_DB_PATH.
pub fn analytics_db_path() -> PathBuf {
    load_dotenv();
    match std::env::var("ANALITHICS_DB_PATH") {
        Ok(p) => PathBuf::from(p),
        Err(_) => PathBuf::from("analithics/analytics.db"),
    }
}

/// Initialize the analytics DB (create dir + sqlite file + tables).
/// Analytics is best-effort everywhere: callers log and ignore failures.
pub fn init_db() -> Result<(), Box<dyn Error>> {
    let db_path = analytics_db_path();
    if let Some(dir) = db_path.parent() {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }

    let conn = Connection::open(db_path)?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS queries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ts TEXT NOT NULL,
            duration_ms INTEGER,
            email TEXT,
            capacity INTEGER,
            completed_json TEXT,
            desired_json TEXT,
            request_json TEXT,
            response_json TEXT,
            client_ip TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS cache_stats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ts TEXT NOT NULL,
            hits INTEGER,
            misses INTEGER,
            entries INTEGER
        )",
        [],
    )?;

    Ok(())
}

/// Record a resolver cache snapshot into cache_stats.
pub fn record_cache_stats(ts: &str, hits: i64, misses: i64, entries: i64) -> Result<(), Box<dyn Error>> {
    let conn = Connection::open(analytics_db_path())?;
    conn.execute(
        "INSERT INTO cache_stats (ts, hits, misses, entries) VALUES (?1, ?2, ?3, ?4)",
        params![ts, hits, misses, entries],
    )?;
    Ok(())
}
