//! In-process collaborators that log instead of calling a platform.
//!
//! Thread ids are handed out sequentially. Topics whose name starts with
//! `FAIL` are refused and items whose payload starts with `fail:` are
//! rejected, so creation failures and partial commits can be tried by hand.

use std::sync::atomic::{AtomicI64, Ordering};

use thiserror::Error;
use topicrelay_app::{ChannelAdmin, ContentDelivery, DeliveryRequest};
use topicrelay_core::{ContentKind, DestinationId, ThreadId, TopicName};
use tracing::info;

const FAIL_TOPIC: &str = "FAIL";
const FAIL_PAYLOAD: &str = "fail:";

/// Errors produced by the loopback collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoopbackError {
    /// Topic creation refused.
    #[error("topic {0} refused by loopback")]
    TopicRefused(String),

    /// Item delivery refused.
    #[error("{kind} {payload} refused by loopback")]
    DeliveryRefused {
        /// Kind of the refused item
        kind: ContentKind,
        /// Payload of the refused item
        payload: String,
    },
}

/// Topic creation that assigns sequential thread ids.
#[derive(Debug, Default)]
pub struct LoopbackAdmin {
    last_thread: AtomicI64,
}

impl LoopbackAdmin {
    /// Create an admin whose first topic gets thread 1.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChannelAdmin for LoopbackAdmin {
    type Error = LoopbackError;

    async fn create_topic(
        &self,
        destination: DestinationId,
        name: &TopicName,
    ) -> Result<ThreadId, LoopbackError> {
        if name.as_str().to_ascii_uppercase().starts_with(FAIL_TOPIC) {
            return Err(LoopbackError::TopicRefused(name.to_string()));
        }

        let thread_id = ThreadId(self.last_thread.fetch_add(1, Ordering::Relaxed) + 1);
        info!(%destination, topic = %name, thread = %thread_id, "loopback topic created");
        Ok(thread_id)
    }
}

/// Delivery that logs each item.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoopbackDelivery;

impl LoopbackDelivery {
    fn deliver(self, kind: ContentKind, request: DeliveryRequest<'_>) -> Result<(), LoopbackError> {
        let payload = request.payload.as_str();
        if payload.starts_with(FAIL_PAYLOAD) {
            return Err(LoopbackError::DeliveryRefused { kind, payload: payload.to_string() });
        }

        info!(
            destination = %request.destination,
            topic = %request.topic.name,
            thread = %request.thread_id(),
            %kind,
            payload,
            caption = request.caption.unwrap_or_default(),
            entities = request.entities.len(),
            "loopback delivery"
        );
        Ok(())
    }
}

impl ContentDelivery for LoopbackDelivery {
    type Error = LoopbackError;

    async fn send_text(&self, request: DeliveryRequest<'_>) -> Result<(), LoopbackError> {
        self.deliver(ContentKind::Text, request)
    }

    async fn send_photo(&self, request: DeliveryRequest<'_>) -> Result<(), LoopbackError> {
        self.deliver(ContentKind::Photo, request)
    }

    async fn send_video(&self, request: DeliveryRequest<'_>) -> Result<(), LoopbackError> {
        self.deliver(ContentKind::Video, request)
    }

    async fn send_document(&self, request: DeliveryRequest<'_>) -> Result<(), LoopbackError> {
        self.deliver(ContentKind::Document, request)
    }
}
