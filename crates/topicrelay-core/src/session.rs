//! Session record and observable snapshots.
//!
//! The [`Session`] is the single mutable record of what destination and topic
//! are bound and what is queued. Only [`crate::SessionEngine`] mutates it; the
//! adapter and tests observe it through [`SessionSnapshot`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ContentKind, DestinationId, QueuedItem, TopicName, TopicRef};

/// Upload session state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No upload in progress.
    #[default]
    Idle,
    /// Destination chosen, waiting for the operator to pick a topic.
    AwaitingTopicSelection,
    /// Waiting for the name of a new topic (or for its creation).
    AwaitingTopicName,
    /// Topic bound, content is being queued.
    Active,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::AwaitingTopicSelection => "awaiting topic selection",
            Self::AwaitingTopicName => "awaiting topic name",
            Self::Active => "active",
        })
    }
}

/// The live upload session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Current state.
    state: SessionState,
    /// Destination bound for this session. `None` while idle.
    destination: Option<DestinationId>,
    /// Topic bound for this session. `None` until active.
    topic: Option<TopicRef>,
    /// Name handed to the collaborator for creation, awaiting its result.
    pending_topic: Option<TopicName>,
    /// Queued items in delivery order.
    queue: Vec<QueuedItem>,
}

impl Session {
    /// Create an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Bound destination. `None` while idle.
    pub fn destination(&self) -> Option<DestinationId> {
        self.destination
    }

    /// Bound topic. `None` until active.
    pub fn topic(&self) -> Option<&TopicRef> {
        self.topic.as_ref()
    }

    /// Name of a topic whose creation is in flight.
    pub fn pending_topic(&self) -> Option<&TopicName> {
        self.pending_topic.as_ref()
    }

    /// Queued items, oldest first.
    pub fn queue(&self) -> &[QueuedItem] {
        &self.queue
    }

    /// Observable copy of the session for checks and display.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            destination: self.destination,
            topic: self.topic.as_ref().map(|t| t.name.clone()),
            pending_topic: self.pending_topic.clone(),
            queued: self.queue.iter().map(QueuedItem::kind).collect(),
        }
    }

    pub(crate) fn bind_destination(&mut self, destination: DestinationId) {
        self.destination = Some(destination);
        self.state = SessionState::AwaitingTopicSelection;
    }

    pub(crate) fn await_topic_name(&mut self) {
        self.state = SessionState::AwaitingTopicName;
    }

    pub(crate) fn set_pending_topic(&mut self, name: TopicName) {
        self.pending_topic = Some(name);
        self.state = SessionState::AwaitingTopicName;
    }

    pub(crate) fn take_pending_topic(&mut self) -> Option<TopicName> {
        self.pending_topic.take()
    }

    pub(crate) fn activate(&mut self, topic: TopicRef) {
        self.topic = Some(topic);
        self.pending_topic = None;
        self.queue.clear();
        self.state = SessionState::Active;
    }

    pub(crate) fn push(&mut self, item: QueuedItem) -> usize {
        self.queue.push(item);
        self.queue.len() - 1
    }

    pub(crate) fn take_queue(&mut self) -> Vec<QueuedItem> {
        std::mem::take(&mut self.queue)
    }

    /// Return to the initial shape: idle, unbound, empty queue.
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Observable session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Current state.
    pub state: SessionState,
    /// Bound destination.
    pub destination: Option<DestinationId>,
    /// Name of the bound topic.
    pub topic: Option<TopicName>,
    /// Name of a topic whose creation is in flight.
    pub pending_topic: Option<TopicName>,
    /// Kinds of queued items, in queue order.
    pub queued: Vec<ContentKind>,
}

impl SessionSnapshot {
    /// Check if this is the initial idle shape.
    pub fn is_pristine(&self) -> bool {
        *self == Self::default()
    }
}
