mod config;
mod db;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::ServiceConfig::from_env().expect("invalid service configuration");
    let pool = db::init_pool(&config).expect("database pool init failed");

    // Schema problems are reported but never block startup.
    if let Err(e) = db::verify_schema(&pool).await {
        tracing::error!(error = %e, "database schema check failed");
    }

    let state = state::AppState::new(pool);
    let app = routes::app(state);
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind");

    tracing::info!(addr = %bind_addr, "card service listening");
    axum::serve(listener, app).await.expect("server failed");
}
