use std::net::SocketAddr;
use std::sync::Arc;

use docproc_pdf_mupdf::MupdfConverter;
use docproc_web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let api_key = std::env::var("DOCLING_API_KEY")
        .unwrap_or_else(|_| "your-secure-api-key-here".to_string());

    let state = Arc::new(AppState {
        converter: Arc::new(MupdfConverter::new()),
        api_key,
        http: reqwest::Client::new(),
    });

    let app = docproc_web::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8000));
    tracing::info!(addr = %addr, "docling-processor listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
