pub mod db;
pub mod insertions;

pub use db::init_db;
pub use insertions::{log_query, record_cache_snapshot};
