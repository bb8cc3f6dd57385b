use folio_core::config::MediaConfig;
use folio_db::DbConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_migrate=debug,folio_db=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let db_config = DbConfig::from_env();
    let media_config = MediaConfig::from_env();
    tracing::info!(
        max_connections = db_config.max_connections,
        media_root = %media_config.media_root.display(),
        "Loaded configuration"
    );

    // --- Database ---
    let pool = folio_db::connect(&db_config)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    folio_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    folio_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Media root ---
    let uploads = media_config
        .media_root
        .join(folio_core::upload::UPLOADS_DIR);
    tokio::fs::create_dir_all(&uploads)
        .await
        .expect("Failed to create media upload directory");
    tracing::info!(path = %uploads.display(), "Media upload directory ready");

    pool.close().await;
}
