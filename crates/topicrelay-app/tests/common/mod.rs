//! Recording fake collaborators shared by the relay tests.

#![allow(dead_code)]

use std::{
    collections::BTreeSet,
    sync::{
        Mutex,
        atomic::{AtomicI64, AtomicUsize, Ordering},
    },
    time::Duration,
};

use thiserror::Error;
use topicrelay_app::{ChannelAdmin, ContentDelivery, DeliveryRequest};
use topicrelay_core::{
    ContentKind, DestinationId, FormattingEntity, ThreadId, TopicName, TopicRef,
};

#[derive(Debug, Error)]
#[error("{0}")]
pub struct FakeError(pub String);

#[derive(Default)]
pub struct FakeAdmin {
    pub next_thread: AtomicI64,
    pub created: Mutex<Vec<(DestinationId, String)>>,
    pub refuse: bool,
    pub stall: bool,
}

impl FakeAdmin {
    pub fn created(&self) -> Vec<(DestinationId, String)> {
        self.created.lock().unwrap().clone()
    }
}

impl ChannelAdmin for FakeAdmin {
    type Error = FakeError;

    async fn create_topic(
        &self,
        destination: DestinationId,
        name: &TopicName,
    ) -> Result<ThreadId, FakeError> {
        if self.stall {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.refuse {
            return Err(FakeError("not enough rights to manage topics".into()));
        }
        self.created.lock().unwrap().push((destination, name.to_string()));
        Ok(ThreadId(self.next_thread.fetch_add(1, Ordering::SeqCst) + 10))
    }
}

/// One request as it reached the delivery collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub kind: ContentKind,
    pub destination: DestinationId,
    pub topic: TopicRef,
    pub payload: String,
    pub caption: Option<String>,
    pub entities: Vec<FormattingEntity>,
}

#[derive(Default)]
pub struct FakeDelivery {
    pub attempts: AtomicUsize,
    pub fail_attempts: BTreeSet<usize>,
    pub stall_kind: Option<ContentKind>,
    pub delivered: Mutex<Vec<Delivered>>,
}

impl FakeDelivery {
    pub fn failing(attempts: impl IntoIterator<Item = usize>) -> Self {
        Self { fail_attempts: attempts.into_iter().collect(), ..Self::default() }
    }

    /// Successful deliveries as `(kind, payload, thread)`.
    pub fn sent(&self) -> Vec<(ContentKind, String, ThreadId)> {
        self.delivered()
            .into_iter()
            .map(|d| (d.kind, d.payload, d.topic.thread_id))
            .collect()
    }

    pub fn delivered(&self) -> Vec<Delivered> {
        self.delivered.lock().unwrap().clone()
    }

    async fn send(&self, kind: ContentKind, request: DeliveryRequest<'_>) -> Result<(), FakeError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        let payload = request.payload.to_string();
        tokio::task::yield_now().await;

        if self.stall_kind == Some(kind) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.fail_attempts.contains(&attempt) {
            return Err(FakeError(format!("rejected {payload}")));
        }
        self.delivered.lock().unwrap().push(Delivered {
            kind,
            destination: request.destination,
            topic: request.topic.clone(),
            payload,
            caption: request.caption.map(str::to_string),
            entities: request.entities.to_vec(),
        });
        Ok(())
    }
}

impl ContentDelivery for FakeDelivery {
    type Error = FakeError;

    async fn send_text(&self, request: DeliveryRequest<'_>) -> Result<(), FakeError> {
        self.send(ContentKind::Text, request).await
    }

    async fn send_photo(&self, request: DeliveryRequest<'_>) -> Result<(), FakeError> {
        self.send(ContentKind::Photo, request).await
    }

    async fn send_video(&self, request: DeliveryRequest<'_>) -> Result<(), FakeError> {
        self.send(ContentKind::Video, request).await
    }

    async fn send_document(&self, request: DeliveryRequest<'_>) -> Result<(), FakeError> {
        self.send(ContentKind::Document, request).await
    }
}
