//! Delivery plans and reports.
//!
//! Committing a session yields a [`DeliveryPlan`]: the drained queue plus the
//! destination and topic it is bound for. The caller delivers the items in
//! plan order, one attempt each, and tallies every outcome into the plan's
//! [`DeliveryReport`]. A failed item never stops the items after it.

use serde::{Deserialize, Serialize};

use crate::{ContentKind, DestinationId, QueuedItem, TopicRef};

/// Ordered delivery instructions produced by a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryPlan {
    destination: DestinationId,
    topic: TopicRef,
    items: Vec<QueuedItem>,
}

impl DeliveryPlan {
    pub(crate) fn new(destination: DestinationId, topic: TopicRef, items: Vec<QueuedItem>) -> Self {
        Self { destination, topic, items }
    }

    /// Destination every item goes to.
    pub fn destination(&self) -> DestinationId {
        self.destination
    }

    /// Topic every item goes to.
    pub fn topic(&self) -> &TopicRef {
        &self.topic
    }

    /// Items in enqueue order.
    pub fn items(&self) -> &[QueuedItem] {
        &self.items
    }

    /// Number of items to deliver.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the plan has no items. Never true for a plan from a commit.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items paired with their original queue index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &QueuedItem)> {
        self.items.iter().enumerate()
    }

    /// Empty report for this plan, ready for tallying.
    pub fn report(&self) -> DeliveryReport {
        DeliveryReport {
            destination: self.destination,
            topic: self.topic.clone(),
            counts: KindCounts::default(),
            failures: Vec::new(),
        }
    }
}

/// Successful deliveries per content kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    /// Delivered text items.
    pub texts: usize,
    /// Delivered photos.
    pub photos: usize,
    /// Delivered videos.
    pub videos: usize,
    /// Delivered documents.
    pub documents: usize,
}

impl KindCounts {
    /// Count for one kind.
    pub fn get(&self, kind: ContentKind) -> usize {
        match kind {
            ContentKind::Text => self.texts,
            ContentKind::Photo => self.photos,
            ContentKind::Video => self.videos,
            ContentKind::Document => self.documents,
        }
    }

    /// Sum over all kinds.
    pub fn total(&self) -> usize {
        self.texts + self.photos + self.videos + self.documents
    }

    fn increment(&mut self, kind: ContentKind) {
        let slot = match kind {
            ContentKind::Text => &mut self.texts,
            ContentKind::Photo => &mut self.photos,
            ContentKind::Video => &mut self.videos,
            ContentKind::Document => &mut self.documents,
        };
        *slot = slot.saturating_add(1);
    }
}

/// A single item that could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFailure {
    /// Position of the item in the committed queue.
    pub index: usize,
    /// Kind of the failed item.
    pub kind: ContentKind,
    /// Collaborator error summary.
    pub error: String,
}

/// Outcome of one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Destination the plan targeted.
    pub destination: DestinationId,
    /// Topic the plan targeted.
    pub topic: TopicRef,
    /// Successful deliveries by kind.
    pub counts: KindCounts,
    /// Failed items, in queue order.
    pub failures: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    /// Record a successful delivery.
    pub fn record_success(&mut self, kind: ContentKind) {
        self.counts.increment(kind);
    }

    /// Record a failed delivery of the item at `index`.
    pub fn record_failure(&mut self, index: usize, kind: ContentKind, error: impl Into<String>) {
        self.failures.push(DeliveryFailure { index, kind, error: error.into() });
    }

    /// Record either outcome.
    pub fn record<E: std::fmt::Display>(
        &mut self,
        index: usize,
        kind: ContentKind,
        outcome: Result<(), E>,
    ) {
        match outcome {
            Ok(()) => self.record_success(kind),
            Err(e) => self.record_failure(index, kind, e.to_string()),
        }
    }

    /// Number of items delivered.
    pub fn delivered(&self) -> usize {
        self.counts.total()
    }

    /// Number of items attempted.
    pub fn attempted(&self) -> usize {
        self.delivered() + self.failures.len()
    }

    /// Check if every attempted item was delivered.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
