use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tuneful_core::{config::config_from_env_values, MediaLibrary};

/// Main entry point for the Tuneful application
///
/// Resolves configuration, opens the song library and serves the REST API.
///
/// # Environment Variables
/// - `TUNEFUL_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `TUNEFUL_CONFIG`: `production` (default) or `testing`
/// - `TUNEFUL_DATABASE_PATH`: SQLite database file (default: `tuneful.db`, in-memory when testing)
/// - `TUNEFUL_UPLOAD_DIR`: directory for uploaded files (default: `uploads`)
/// - `TUNEFUL_MAX_UPLOAD_BYTES`: largest accepted upload body (default: 50 MiB)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - any configuration value is invalid,
/// - the database or upload directory cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tuneful=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("TUNEFUL_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = config_from_env_values(
        std::env::var("TUNEFUL_CONFIG").ok(),
        std::env::var("TUNEFUL_DATABASE_PATH").ok(),
        std::env::var("TUNEFUL_UPLOAD_DIR").ok(),
        std::env::var("TUNEFUL_MAX_UPLOAD_BYTES").ok(),
    )?;
    tracing::info!(
        "++ {:?} configuration, uploads in {}",
        cfg.environment(),
        cfg.upload_dir().display()
    );

    let library = MediaLibrary::open(&cfg)?;
    let app = api_rest::router(api_rest::AppState::new(library), cfg.max_upload_bytes());

    tracing::info!("++ Starting Tuneful REST on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
