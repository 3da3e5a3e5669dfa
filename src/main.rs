use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wabot_backend::config::Config;
use wabot_backend::routes::create_router;
use wabot_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    if config.openai_api_key.is_empty() {
        warn!("OPENAI_API_KEY is not set; chat replies will report an error");
    }
    if config.whatsapp_token.is_empty() || config.whatsapp_phone_number_id.is_empty() {
        warn!("WhatsApp credentials are not set; outbound messages will fail");
    }

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    info!("upload directory: {}", config.upload_dir.display());

    let port = config.port;
    let state = Arc::new(AppState::new(&config));

    let cors = CorsLayer::very_permissive();
    let app = create_router().with_state(state).layer(cors);

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
