use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use santa_cloud_backend::config::{Args, BackendConfig};
use santa_cloud_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --log-level when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app_state = initialize_backend(BackendConfig::from(&args)).await?;

    if app_state.simulator.interval().is_zero() {
        info!("Reindeer simulator timer disabled");
    } else {
        app_state.simulator.start().await;
    }

    let app = create_router(app_state);

    info!("Starting server on {}", args.listen);
    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!("Listening on {}", args.listen);

    axum::serve(listener, app).await?;

    Ok(())
}
