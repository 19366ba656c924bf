use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use user_service::infrastructure::AppState;
use user_service::{config, db, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = config::Config::from_env().context("Invalid configuration")?;
    tracing::debug!("Loaded configuration: {:?}", config);

    // Initialize database
    let db = db::init_db(&config.database_url())
        .await
        .context("Failed to initialize database")?;

    let state = AppState::new(db, &config.jwt_secret);
    let app = server::build_router(state, &config.cors_allowed_origins);

    server::serve(app, config.port)
        .await
        .context("Server terminated with an error")?;

    tracing::info!("user-service stopped");
    Ok(())
}
