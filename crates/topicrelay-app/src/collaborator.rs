//! Collaborator capabilities the relay depends on.
//!
//! The relay never talks to a chat platform directly. The transport adapter
//! provides a [`ChannelAdmin`] for topic creation and a [`ContentDelivery`]
//! for sending items, so the same orchestration runs against a real bot API,
//! the console loopback and test fakes.

use std::future::Future;

use topicrelay_core::{
    ContentKind, DestinationId, FormattingEntity, PayloadRef, QueuedItem, ThreadId, TopicName,
    TopicRef,
};

/// Creates topics inside a destination channel.
pub trait ChannelAdmin: Send + Sync {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Create a topic named `name` in `destination`.
    ///
    /// Returns the thread that content for the topic is posted into.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses or the call fails. The relay
    /// does not retry.
    fn create_topic(
        &self,
        destination: DestinationId,
        name: &TopicName,
    ) -> impl Future<Output = Result<ThreadId, Self::Error>> + Send;
}

/// One item addressed to a topic thread.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryRequest<'a> {
    /// Destination channel.
    pub destination: DestinationId,
    /// Target topic, name and thread.
    pub topic: &'a TopicRef,
    /// Text body, or file handle for media.
    pub payload: &'a PayloadRef,
    /// Media caption.
    pub caption: Option<&'a str>,
    /// Formatting spans for the body or caption.
    pub entities: &'a [FormattingEntity],
}

impl<'a> DeliveryRequest<'a> {
    /// Address `item` to `topic` in `destination`.
    pub fn new(destination: DestinationId, topic: &'a TopicRef, item: &'a QueuedItem) -> Self {
        Self {
            destination,
            topic,
            payload: item.payload(),
            caption: item.caption(),
            entities: item.entities(),
        }
    }

    /// Thread the item is posted into.
    pub fn thread_id(&self) -> ThreadId {
        self.topic.thread_id
    }
}

/// Sends content items into topic threads, one method per kind.
///
/// Each call is a single attempt. Failures are reported per item and never
/// abort the rest of a batch.
pub trait ContentDelivery: Send + Sync {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Send a text message. `request.payload` is the body.
    fn send_text(
        &self,
        request: DeliveryRequest<'_>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send a photo.
    fn send_photo(
        &self,
        request: DeliveryRequest<'_>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send a video.
    fn send_video(
        &self,
        request: DeliveryRequest<'_>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send a document.
    fn send_document(
        &self,
        request: DeliveryRequest<'_>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Route `request` to the send method matching `kind`.
pub(crate) async fn send<D: ContentDelivery>(
    delivery: &D,
    kind: ContentKind,
    request: DeliveryRequest<'_>,
) -> Result<(), D::Error> {
    match kind {
        ContentKind::Text => delivery.send_text(request).await,
        ContentKind::Photo => delivery.send_photo(request).await,
        ContentKind::Video => delivery.send_video(request).await,
        ContentKind::Document => delivery.send_document(request).await,
    }
}
