//! API server lifecycle: starts/stops the axum HTTP server.
//!
//! bind → spawn background task → return handle with shutdown channel.

use std::net::SocketAddr;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::api_router;
use crate::api::types::ApiContext;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

/// Where a running API server is listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiSession {
    pub server_addr: SocketAddr,
    pub port: u16,
}

/// Handle to a running API server.
pub struct ApiServer {
    pub session: ApiSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Wait for the server task to finish (after `shutdown`, or on error).
    pub async fn wait(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("API server task failed: {e}");
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Start the API server on the given address.
///
/// Port `0` binds an ephemeral port; the chosen one is in the session.
pub async fn start_server_on(ctx: ApiContext, addr: SocketAddr) -> Result<ApiServer, String> {
    // 1. Bind
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind API server on {addr}: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    tracing::info!(%addr, "API server binding");

    // 2. Build the router
    let app = api_router(ctx);

    // 3. Record the bound address
    let session = ApiSession {
        server_addr: addr,
        port: addr.port(),
    };

    // 4. Set up shutdown signal
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    // 5. Spawn server in background task
    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Arc;

    use super::*;
    use crate::db::{open_memory_database, SqlitePaperStore};
    use crate::events::{ChannelTransport, TopicPublisher};
    use crate::submission::SubmissionService;

    fn test_ctx() -> (ApiContext, tokio::sync::mpsc::UnboundedReceiver<crate::events::EventRecord>) {
        let store = Arc::new(SqlitePaperStore::new(open_memory_database().unwrap()));
        let (transport, rx) = ChannelTransport::new();
        let publisher = Arc::new(TopicPublisher::new("paper-events", Arc::new(transport)));
        let service = Arc::new(SubmissionService::new(store, publisher));
        (ApiContext::new(service), rx)
    }

    fn localhost() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let (ctx, _rx) = test_ctx();
        let mut server = start_server_on(ctx, localhost())
            .await
            .expect("server should start");

        assert!(server.session.port > 0);
        assert_eq!(server.session.server_addr.port(), server.session.port);
        assert!(server.session.server_addr.ip().is_loopback());

        let url = format!("http://127.0.0.1:{}/api/health", server.session.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        server.shutdown();
        server.wait().await;
    }

    #[tokio::test]
    async fn server_serves_submission_routes() {
        let (ctx, mut rx) = test_ctx();
        let mut server = start_server_on(ctx, localhost())
            .await
            .expect("server should start");
        let port = server.session.port;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/v1/submissions"))
            .json(&serde_json::json!({"title": "Over the wire", "author": "Tester"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
        let created: serde_json::Value = resp.json().await.unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let record = rx.recv().await.unwrap();
        assert_eq!(record.key, id);

        let resp = client
            .get(format!("http://127.0.0.1:{port}/api/internal/papers/{id}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        // Unknown route returns 404
        let resp = reqwest::get(format!("http://127.0.0.1:{port}/nonexistent"))
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        drop(client);
        server.shutdown();
        server.wait().await;
    }

    #[tokio::test]
    async fn binding_a_taken_port_fails() {
        let (ctx, _rx) = test_ctx();
        let taken = tokio::net::TcpListener::bind(localhost()).await.unwrap();
        let addr = taken.local_addr().unwrap();

        let err = start_server_on(ctx, addr).await.err().unwrap();
        assert!(err.contains("Failed to bind"));
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let (ctx, _rx) = test_ctx();
        let mut server = start_server_on(ctx, localhost())
            .await
            .expect("server should start");

        server.shutdown();
        server.shutdown(); // Second call should be safe
        server.wait().await;
    }
}
