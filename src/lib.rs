pub mod api;
pub mod config;
pub mod db;
pub mod events;
pub mod models;
pub mod submission;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::events::{EventTransport, TopicPublisher};

/// Initialize tracing. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Wire the service from configuration and serve until Ctrl-C.
pub async fn run() -> Result<(), String> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let settings = ServerConfig::from_env().map_err(|e| e.to_string())?;

    let conn = db::open_database(&settings.db_path).map_err(|e| e.to_string())?;
    let store = Arc::new(db::SqlitePaperStore::new(conn));

    let transport: Arc<dyn EventTransport> = match &settings.broker_url {
        Some(url) => {
            tracing::info!(broker = %url, topic = config::EVENT_TOPIC, "Publishing events to REST proxy");
            Arc::new(
                events::RestProxyTransport::new(url, settings.publish_timeout)
                    .map_err(|e| e.to_string())?,
            )
        }
        None => {
            tracing::warn!("No broker configured; events are only logged");
            let (transport, rx) = events::ChannelTransport::new();
            events::transport::drain_to_log(rx);
            Arc::new(transport)
        }
    };
    let publisher = Arc::new(TopicPublisher::new(config::EVENT_TOPIC, transport));

    let service = Arc::new(submission::SubmissionService::new(store, publisher));
    let mut server = api::start_server_on(api::ApiContext::new(service), settings.bind_addr).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }

    server.shutdown();
    server.wait().await;
    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
