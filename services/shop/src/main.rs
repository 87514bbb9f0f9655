use anyhow::{Context, Result};
use common::database;
use sqlx::migrate::Migrator;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shop::{
    AppState, Repositories,
    auth::AdminCredentials,
    config::AppConfig,
    create_router,
    jwt::JwtService,
    repositories::{PgCartRepository, PgProductRepository, PgUserRepository},
    storage::ImageStore,
};

static MIGRATOR: Migrator = sqlx::migrate!();

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting shop service");

    let config = AppConfig::from_env()?;

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool, &MIGRATOR).await?;

    let jwt_service = JwtService::new(&config.jwt_secret, config.token_ttl_seconds)?;
    let images = ImageStore::new(&config.upload_dir, config.public_base_url.clone());
    images.ensure_root().await.with_context(|| {
        format!(
            "Failed to create upload directory {}",
            config.upload_dir.display()
        )
    })?;

    let repositories = Repositories {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        carts: Arc::new(PgCartRepository::new(pool.clone())),
        products: Arc::new(PgProductRepository::new(pool)),
    };
    let admin = AdminCredentials {
        email: config.admin_email.clone(),
        password_hash: config.admin_password_hash.clone(),
    };

    let app_state = AppState::new(
        repositories,
        jwt_service,
        admin,
        images,
        config.max_upload_bytes,
    );

    // Start the web server
    let app = create_router(app_state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Shop service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shop service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
