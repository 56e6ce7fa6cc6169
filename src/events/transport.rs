//! Event transports, where a serialized event actually goes.
//!
//! - `RestProxyTransport` produces to Kafka through a REST Proxy
//!   (v2 binary embedded format, so the record bytes are exactly the
//!   JSON text and the key bytes exactly the partition key).
//! - `ChannelTransport` hands records to an in-process receiver.

use std::time::Duration;

use base64::Engine as _;
use futures_util::future::{self, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::EventError;

const REST_PROXY_CONTENT_TYPE: &str = "application/vnd.kafka.binary.v2+json";
const REST_PROXY_ACCEPT: &str = "application/vnd.kafka.v2+json";

/// A serialized event bound for a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub topic: String,
    pub key: String,
    pub payload: String,
}

/// Sends records to a message channel.
///
/// The returned future resolves once the transport has confirmed (or
/// failed) delivery. Callers that must not wait spawn it.
pub trait EventTransport: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &'static str;

    fn send(&self, record: EventRecord) -> BoxFuture<'static, Result<(), EventError>>;
}

// ═══════════════════════════════════════════════════════════
// Kafka REST Proxy
// ═══════════════════════════════════════════════════════════

#[derive(Serialize)]
struct ProduceRequest {
    records: Vec<ProduceRecord>,
}

#[derive(Serialize)]
struct ProduceRecord {
    key: String,
    value: String,
}

#[derive(Deserialize)]
struct ProduceResponse {
    #[serde(default)]
    offsets: Vec<ProduceOffset>,
}

#[derive(Deserialize)]
struct ProduceOffset {
    error_code: Option<i64>,
    error: Option<String>,
}

/// HTTP producer against a Kafka REST Proxy.
pub struct RestProxyTransport {
    base_url: String,
    client: reqwest::Client,
}

impl RestProxyTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EventError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn topic_url(&self, topic: &str) -> String {
        format!("{}/topics/{topic}", self.base_url)
    }
}

impl EventTransport for RestProxyTransport {
    fn name(&self) -> &'static str {
        "rest-proxy"
    }

    fn send(&self, record: EventRecord) -> BoxFuture<'static, Result<(), EventError>> {
        let client = self.client.clone();
        let url = self.topic_url(&record.topic);
        let engine = base64::engine::general_purpose::STANDARD;
        let body = ProduceRequest {
            records: vec![ProduceRecord {
                key: engine.encode(record.key.as_bytes()),
                value: engine.encode(record.payload.as_bytes()),
            }],
        };

        async move {
            let resp = client
                .post(&url)
                .header(reqwest::header::CONTENT_TYPE, REST_PROXY_CONTENT_TYPE)
                .header(reqwest::header::ACCEPT, REST_PROXY_ACCEPT)
                .json(&body)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(EventError::Rejected {
                    status: status.as_u16(),
                    body,
                });
            }

            // The proxy answers 200 even when an individual record failed.
            let produced: ProduceResponse = resp.json().await?;
            if let Some(failed) = produced
                .offsets
                .into_iter()
                .find(|o| o.error_code.is_some() || o.error.is_some())
            {
                return Err(EventError::Rejected {
                    status: status.as_u16(),
                    body: failed
                        .error
                        .unwrap_or_else(|| format!("error_code {}", failed.error_code.unwrap_or(-1))),
                });
            }

            Ok(())
        }
        .boxed()
    }
}

// ═══════════════════════════════════════════════════════════
// In-process channel
// ═══════════════════════════════════════════════════════════

/// Forwards records to an unbounded in-process channel.
#[derive(Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<EventRecord>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EventRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventTransport for ChannelTransport {
    fn name(&self) -> &'static str {
        "channel"
    }

    fn send(&self, record: EventRecord) -> BoxFuture<'static, Result<(), EventError>> {
        let result = self.tx.send(record).map_err(|_| EventError::ChannelClosed);
        future::ready(result).boxed()
    }
}

/// Consume a channel transport's records, logging each one.
///
/// Used when no broker is configured so events stay visible.
pub fn drain_to_log(mut rx: mpsc::UnboundedReceiver<EventRecord>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(record) = rx.recv().await {
            tracing::info!(
                topic = %record.topic,
                key = %record.key,
                payload = %record.payload,
                "Event recorded (no broker configured)"
            );
        }
        tracing::debug!("Event log drain stopped");
    })
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;

    fn record() -> EventRecord {
        EventRecord {
            topic: "paper-events".into(),
            key: "key-1".into(),
            payload: r#"{"id":"key-1"}"#.into(),
        }
    }

    #[derive(Clone, Default)]
    struct Captured {
        requests: Arc<Mutex<Vec<(String, String, serde_json::Value)>>>,
    }

    async fn produce_ok(
        State(captured): State<Captured>,
        Path(topic): Path<String>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> Json<serde_json::Value> {
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        captured.requests.lock().unwrap().push((topic, content_type, body));
        Json(serde_json::json!({
            "offsets": [{"partition": 0, "offset": 7, "error_code": null, "error": null}]
        }))
    }

    async fn produce_partial_failure() -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "offsets": [{"partition": null, "offset": null, "error_code": 40403, "error": "topic not found"}]
        }))
    }

    async fn produce_unavailable() -> (StatusCode, &'static str) {
        (StatusCode::SERVICE_UNAVAILABLE, "broker down")
    }

    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn rest_proxy_posts_base64_record_to_topic() {
        let captured = Captured::default();
        let app = Router::new()
            .route("/topics/:topic", post(produce_ok))
            .with_state(captured.clone());
        let addr = serve(app).await;

        let transport =
            RestProxyTransport::new(&format!("http://{addr}/"), Duration::from_secs(5)).unwrap();
        transport.send(record()).await.unwrap();

        let requests = captured.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (topic, content_type, body) = &requests[0];
        assert_eq!(topic, "paper-events");
        assert_eq!(content_type, REST_PROXY_CONTENT_TYPE);

        let engine = base64::engine::general_purpose::STANDARD;
        let key = engine.decode(body["records"][0]["key"].as_str().unwrap()).unwrap();
        let value = engine.decode(body["records"][0]["value"].as_str().unwrap()).unwrap();
        assert_eq!(key, b"key-1");
        assert_eq!(value, br#"{"id":"key-1"}"#);
    }

    #[tokio::test]
    async fn rest_proxy_non_success_status_is_rejected() {
        let app = Router::new().route("/topics/:topic", post(produce_unavailable));
        let addr = serve(app).await;

        let transport =
            RestProxyTransport::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
        let err = transport.send(record()).await.unwrap_err();
        match err {
            EventError::Rejected { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "broker down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn rest_proxy_record_error_is_rejected() {
        let app = Router::new().route("/topics/:topic", post(produce_partial_failure));
        let addr = serve(app).await;

        let transport =
            RestProxyTransport::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
        let err = transport.send(record()).await.unwrap_err();
        assert!(matches!(err, EventError::Rejected { status: 200, ref body } if body == "topic not found"));
    }

    #[tokio::test]
    async fn rest_proxy_unreachable_broker_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport =
            RestProxyTransport::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        let err = transport.send(record()).await.unwrap_err();
        assert!(matches!(err, EventError::Transport(_)));
    }

    #[tokio::test]
    async fn channel_delivers_record() {
        let (transport, mut rx) = ChannelTransport::new();
        transport.send(record()).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), record());
    }

    #[tokio::test]
    async fn channel_closed_receiver_fails() {
        let (transport, rx) = ChannelTransport::new();
        drop(rx);
        let err = transport.send(record()).await.unwrap_err();
        assert!(matches!(err, EventError::ChannelClosed));
    }
}
