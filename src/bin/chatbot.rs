use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use dahlia::config::ChatbotConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let config = ChatbotConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    let addr = SocketAddr::new(config.host, config.port);
    let app = dahlia::chatbot::build_chatbot_app(config)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Chatbot proxy listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
