use std::net::SocketAddr;
use anyhow::Context;
use emi_api::{app, init_tracing, AppState};
use emi_store::{Config, Repositories};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing("emi_api=debug,emi_core=info,emi_store=info,tower_http=debug,axum::rejection=trace");

    if let Err(err) = run().await {
        tracing::error!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting EMI Product API on port {}", config.server.port);

    // No retry: an unreachable database ends the process
    let repos = Repositories::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    let app = app(AppState::new(repos.service(), config.run_mode));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on port {}", config.server.port);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
