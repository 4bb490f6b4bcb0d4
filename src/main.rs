use dotenvy::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use naturepot_server::config::EnvVars;
use naturepot_server::db::memory::MemoryStore;
use naturepot_server::handlers::{router, AppState};
use naturepot_server::intake::IntakeService;
use naturepot_server::utils::rate_limit::RateLimiter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let intake = IntakeService::new(Arc::new(MemoryStore::new()), RateLimiter::default());
    let state = AppState {
        intake: Arc::new(intake),
        client_ip_header: EnvVars::client_ip_header(),
    };
    let app = router(state, &EnvVars::cors_allowed_origins());

    let addr = EnvVars::bind_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await
}
