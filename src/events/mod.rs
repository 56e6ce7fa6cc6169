//! Paper creation notifications.
//!
//! `PaperCreatedEvent` is the outbound payload, `EventPublisher` the seam the
//! submission service calls, and `EventTransport` the wire underneath it.
//! Every delivery failure ends in the log; none reaches the HTTP caller.

pub mod paper_created;
pub mod publisher;
pub mod transport;

pub use paper_created::PaperCreatedEvent;
pub use publisher::{EventPublisher, TopicPublisher};
pub use transport::{ChannelTransport, EventRecord, EventTransport, RestProxyTransport};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("Event serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Event transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Broker rejected event with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Event channel closed")]
    ChannelClosed,

    #[error("No async runtime available to dispatch event")]
    NoRuntime,
}
