use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, instrument};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trainings::api::{create_routes, AppState};
use trainings::auth::AuthClient;
use trainings::config::{run_migrations, AppConfig, DatabaseConfig, LogFormat};
use trainings::repository::PgTrainingRepository;

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=debug", config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format() {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

#[tokio::main]
#[instrument]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(&config);

    let db_config = DatabaseConfig::from_env()?;
    let pool = db_config.create_pool().await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
        info!("Database migrations applied");
    }

    let repo = Arc::new(PgTrainingRepository::new(pool));
    let auth_client = AuthClient::new(config.auth_base_url.clone())?;
    let app = create_routes(AppState::new(repo, auth_client));

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!(environment = %config.environment, "Trainings server starting on http://{}", address);
    info!("Health check available at http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
