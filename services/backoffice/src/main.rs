use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use backoffice::{
    AppState, MIGRATOR, bootstrap,
    config::AppConfig,
    jwt::JwtService,
    routes,
};
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting back office service");

    let config = AppConfig::load()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool, &MIGRATOR).await?;

    let app_state = AppState::from_pool(pool, JwtService::new(config.jwt.clone()));
    bootstrap::run(&app_state, &config.bootstrap).await?;

    info!("Back office service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let address = config.server.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Back office service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
