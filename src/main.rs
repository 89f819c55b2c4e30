use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

use conference_go::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let state = AppState::from_config(&config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen).await?;

    info!("Server is running on http://{}", config.listen);
    info!("Swagger UI available at http://{}/swagger-ui", config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
