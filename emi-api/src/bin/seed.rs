use anyhow::Context;
use emi_api::init_tracing;
use emi_catalog::sample_catalog;
use emi_store::{Config, Repositories};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing("emi_seed=info,emi_core=info,emi_store=info");

    if let Err(err) = run().await {
        tracing::error!("Error seeding data: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load config")?;
    let repos = Repositories::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    let entries = sample_catalog().context("Sample catalog is malformed")?;
    let report = repos.loader().run(&entries).await?;

    tracing::info!("Seed data created successfully");
    tracing::info!("Created {} products", report.products);
    tracing::info!("Created {} EMI plans", report.plans);
    Ok(())
}
