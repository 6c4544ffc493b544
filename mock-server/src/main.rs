use mock_server::ResponseStyle;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3030".to_string());
    let style = match std::env::var("MOCK_RESPONSE_STYLE").as_deref() {
        Ok("bare") => ResponseStyle::Bare,
        _ => ResponseStyle::Envelope,
    };
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, ?style, "mock careers backend listening");
    mock_server::run(listener, style).await
}
