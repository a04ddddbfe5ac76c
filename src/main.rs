use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use diversity_core::{
    CoreConfig, DEFAULT_DATA_DIR, DiversityService, EventPublisher, QueuePublisher,
    config::store_backend_from_env_value, open_store,
};

/// Main entry point for the diversity service
///
/// Resolves configuration from the environment (loading `.env` first), opens the
/// configured store, starts the event forwarder and serves the REST API.
///
/// # Environment Variables
/// - `DIVERSITY_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `DIVERSITY_DATA_DIR`: Directory for the file store (default: "diversity_data")
/// - `DIVERSITY_STORE`: `file` or `memory` (default: `file`)
/// - `DIVERSITY_API_URL`: Base URL for event links when a request has no `apimurl` header
///
/// # Errors
/// Returns an error if:
/// - the logging filter or server address cannot be parsed,
/// - the configuration is invalid or the store cannot be opened, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("diversity_run=info".parse()?)
                .add_directive("diversity=info".parse()?)
                .add_directive("diversity_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("DIVERSITY_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;

    let data_dir = std::env::var("DIVERSITY_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let store_backend = store_backend_from_env_value(std::env::var("DIVERSITY_STORE").ok())?;
    let api_base_url = std::env::var("DIVERSITY_API_URL").ok();

    let cfg = Arc::new(CoreConfig::new(
        PathBuf::from(data_dir),
        store_backend,
        api_base_url,
    )?);
    tracing::info!(
        data_dir = %cfg.data_dir().display(),
        store = ?cfg.store_backend(),
        "++ Opening diversity store"
    );
    let store = open_store(cfg.clone())?;

    let (publisher, mut events) = QueuePublisher::new();
    let forwarder = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match serde_json::to_string(&event) {
                Ok(body) => tracing::info!(target: "diversity::events", %body, "change notification"),
                Err(e) => tracing::warn!(error = %e, "failed to encode change notification"),
            }
        }
    });
    let publisher: Arc<dyn EventPublisher> = Arc::new(publisher);

    let service = DiversityService::new(cfg, store, publisher);
    let app = router(AppState {
        service: Arc::new(service),
    });

    tracing::info!("++ Starting diversity REST API on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    // The router and every publisher handle are gone now; drain what is queued.
    if let Err(e) = forwarder.await {
        tracing::warn!(error = %e, "event forwarder stopped abnormally");
    }
    tracing::info!("-- Diversity REST API stopped");
    Ok(())
}
