// Biblioteca raíz del crate `coursepath`.
// Reexporta los módulos del subsistema de planificación y el servidor HTTP.
pub mod analithics;
pub mod api_json;
pub mod catalog;
pub mod equivalence;
pub mod models;
pub mod offerings;
pub mod scheduler;
pub mod server;

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
