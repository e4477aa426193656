use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use lab_dashboards::{
    config::Config,
    api::routes::create_router,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;
    info!(
        vision = %config.vision_backend,
        scraper = %config.scraper_backend,
        timeout = ?config.backend_timeout,
        max_upload_bytes = config.max_upload_bytes,
        "Loaded configuration"
    );

    let app = create_router(AppState::new(config));

    let listener = TcpListener::bind(server_addr).await?;

    info!("Listening on http://{}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
