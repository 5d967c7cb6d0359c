// --- Planificador de semestres - Archivo principal ---

use coursepath::run_server;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv::dotenv();
    env_logger::init();

    println!("=== coursepath (semester planning API) ===");
    if let Err(e) = coursepath::analithics::init_db() {
        log::warn!("analytics DB not initialized: {}", e);
    }

    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    println!("Starting server at http://{}", bind);
    run_server(&bind).await
}
