//! Async relay around the session engine.
//!
//! The [`Relay`] owns the engine behind a `tokio::sync::Mutex` and executes
//! what the engine asks for: topic creation through the [`ChannelAdmin`] and
//! plan delivery through the [`ContentDelivery`].
//!
//! Two locks, always taken in this order:
//!
//! - the session gate, held by every operation that mutates the session
//!   toward a commit (destination, topic, content, commit) for its whole
//!   duration, including the delivery loop
//! - the engine lock, held only while the engine itself runs, plus topic
//!   creation
//!
//! A commit drains the queue and releases the engine before delivering, so
//! status, topic listing and cancel keep answering while a slow delivery is
//! in flight. New content and a second commit wait at the gate until the
//! current batch has been attempted.

use std::{fmt, future::Future, time::Duration};

use tokio::sync::Mutex;
use topicrelay_core::{
    AccessGuard, Accepted, ActorId, Cancelled, DeliveryReport, DestinationId, InboundContent,
    MemoryTopicRegistry, SessionEngine, SessionError, SessionSnapshot, SessionState, TopicChoice,
    TopicRef, TopicRegistry, TopicStep,
};
use tracing::{debug, info, warn};

use crate::{ChannelAdmin, Command, ContentDelivery, DeliveryRequest, Reply, collaborator};

/// Relay runtime configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayConfig {
    /// Bound on each item delivery. `None` waits indefinitely.
    pub delivery_timeout: Option<Duration>,
    /// Bound on topic creation. `None` waits indefinitely.
    pub topic_timeout: Option<Duration>,
}

/// Serializes operator input into a [`SessionEngine`] and drives the
/// collaborators on its behalf.
///
/// # Type Parameters
///
/// - `A`: topic creation capability
/// - `D`: content delivery capability
/// - `R`: topic registry backend
pub struct Relay<A, D, R = MemoryTopicRegistry>
where
    A: ChannelAdmin,
    D: ContentDelivery,
    R: TopicRegistry,
{
    gate: Mutex<()>,
    engine: Mutex<SessionEngine<R>>,
    guard: AccessGuard,
    admin: A,
    delivery: D,
    config: RelayConfig,
}

impl<A, D, R> Relay<A, D, R>
where
    A: ChannelAdmin,
    D: ContentDelivery,
    R: TopicRegistry,
{
    /// Create a relay over `engine`.
    pub fn new(engine: SessionEngine<R>, admin: A, delivery: D, config: RelayConfig) -> Self {
        let guard = AccessGuard::new(engine.config().operator);
        Self { gate: Mutex::new(()), engine: Mutex::new(engine), guard, admin, delivery, config }
    }

    /// Check whether `actor` is the operator. Does not touch the session.
    pub fn is_authorized(&self, actor: ActorId) -> bool {
        self.guard.is_authorized(actor)
    }

    /// Open a session on `destination`.
    pub async fn select_destination(
        &self,
        actor: ActorId,
        destination: DestinationId,
    ) -> Result<SessionState, SessionError> {
        let _gate = self.gate.lock().await;
        self.engine.lock().await.select_destination(actor, destination)
    }

    /// Open a session on the configured default destination.
    pub async fn start_upload(&self, actor: ActorId) -> Result<SessionState, SessionError> {
        let _gate = self.gate.lock().await;
        self.engine.lock().await.start_upload(actor)
    }

    /// Apply a topic choice, creating the topic through the admin when the
    /// engine asks for it.
    ///
    /// A failed or timed-out creation resets the session to idle.
    pub async fn select_topic(
        &self,
        actor: ActorId,
        choice: TopicChoice,
    ) -> Result<SessionState, SessionError> {
        let _gate = self.gate.lock().await;
        let mut engine = self.engine.lock().await;

        let request = match engine.select_topic(actor, choice)? {
            TopicStep::Ready(state) => return Ok(state),
            TopicStep::Create(request) => request,
        };

        let created = bounded(
            self.config.topic_timeout,
            self.admin.create_topic(request.destination, &request.name),
        )
        .await;

        match created {
            Ok(thread_id) => engine.topic_created(thread_id),
            Err(reason) => Err(engine.topic_creation_failed(reason)),
        }
    }

    /// Classify and queue inbound content.
    pub async fn accept(
        &self,
        actor: ActorId,
        content: InboundContent,
    ) -> Result<Accepted, SessionError> {
        let _gate = self.gate.lock().await;
        self.engine.lock().await.accept(actor, content)
    }

    /// Deliver the queue in order and report per-item outcomes.
    ///
    /// Every item gets exactly one attempt. A failed item is recorded and
    /// delivery continues with the next. The session is idle as soon as the
    /// queue is drained; the gate stays held until the last attempt.
    pub async fn commit(&self, actor: ActorId) -> Result<DeliveryReport, SessionError> {
        let _gate = self.gate.lock().await;
        let plan = self.engine.lock().await.commit(actor)?;
        let mut report = plan.report();

        for (index, item) in plan.iter() {
            let request = DeliveryRequest::new(plan.destination(), plan.topic(), item);
            let outcome = bounded(
                self.config.delivery_timeout,
                collaborator::send(&self.delivery, item.kind(), request),
            )
            .await;

            if let Err(error) = &outcome {
                warn!(index, kind = %item.kind(), %error, "item delivery failed");
            }
            report.record(index, item.kind(), outcome);
        }

        info!(
            destination = %report.destination,
            topic = %report.topic.name,
            delivered = report.delivered(),
            failed = report.failures.len(),
            "commit finished"
        );
        Ok(report)
    }

    /// Discard the session. Does not wait for an in-flight commit.
    pub async fn cancel(&self, actor: ActorId) -> Result<Cancelled, SessionError> {
        self.engine.lock().await.cancel(actor)
    }

    /// Registered topics of `destination`.
    pub async fn topics(
        &self,
        actor: ActorId,
        destination: DestinationId,
    ) -> Result<Vec<TopicRef>, SessionError> {
        self.engine.lock().await.topics(actor, destination)
    }

    /// Copy of the current session.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.engine.lock().await.snapshot()
    }

    /// Topic creation collaborator.
    pub fn admin(&self) -> &A {
        &self.admin
    }

    /// Delivery collaborator.
    pub fn delivery(&self) -> &D {
        &self.delivery
    }

    /// Handle one inbound message and render the reply.
    ///
    /// Slash commands are parsed, plain text names the topic while the
    /// session waits for one, and everything else is queued.
    pub async fn handle(&self, actor: ActorId, content: InboundContent) -> Reply {
        if !self.is_authorized(actor) {
            debug!(%actor, "ignoring message from unauthorized actor");
            return Reply::error(&SessionError::Unauthorized);
        }

        let parsed = content.text.as_deref().and_then(Command::parse);
        let outcome = match parsed {
            Some(Ok(command)) => self.execute(actor, command).await,
            Some(Err(error)) => return Reply::command_error(&error),
            None => self.message(actor, content).await,
        };

        outcome.unwrap_or_else(|error| Reply::error(&error))
    }

    async fn execute(&self, actor: ActorId, command: Command) -> Result<Reply, SessionError> {
        debug!(?command, "executing command");

        match command {
            Command::Start => Ok(Reply::greeting()),
            Command::Help => Ok(Reply::help()),
            Command::Upload { destination } => {
                match destination {
                    Some(destination) => self.select_destination(actor, destination).await?,
                    None => self.start_upload(actor).await?,
                };
                self.prompt(actor).await
            },
            Command::Topics => {
                let destination = self.listing_destination().await?;
                let topics = self.topics(actor, destination).await?;
                Ok(Reply::topics(destination, &topics))
            },
            Command::Topic { name } => {
                self.select_topic(actor, TopicChoice::Existing(name)).await?;
                Ok(Reply::status(&self.snapshot().await))
            },
            Command::NewTopic { name } => {
                self.select_topic(actor, TopicChoice::New).await?;
                if let Some(name) = name {
                    self.select_topic(actor, TopicChoice::Name(name)).await?;
                }
                Ok(Reply::status(&self.snapshot().await))
            },
            Command::Done => Ok(Reply::report(&self.commit(actor).await?)),
            Command::Cancel => Ok(Reply::cancelled(&self.cancel(actor).await?)),
            Command::Status => Ok(Reply::status(&self.snapshot().await)),
        }
    }

    async fn message(&self, actor: ActorId, content: InboundContent) -> Result<Reply, SessionError> {
        let naming = matches!(
            self.snapshot().await.state,
            SessionState::AwaitingTopicSelection | SessionState::AwaitingTopicName
        );

        if naming {
            if let Some(name) = content.plain_text() {
                self.select_topic(actor, TopicChoice::Name(name.to_string())).await?;
                return Ok(Reply::status(&self.snapshot().await));
            }
        }
        Ok(Reply::accepted(&self.accept(actor, content).await?))
    }

    /// Status after opening a session, with the topics to choose from.
    async fn prompt(&self, actor: ActorId) -> Result<Reply, SessionError> {
        let snapshot = self.snapshot().await;
        let mut reply = Reply::status(&snapshot);
        if let Some(destination) = snapshot.destination {
            for topic in self.topics(actor, destination).await? {
                reply = reply.with_line(format!("- {}", topic.name));
            }
        }
        Ok(reply)
    }

    async fn listing_destination(&self) -> Result<DestinationId, SessionError> {
        let engine = self.engine.lock().await;
        engine
            .session()
            .destination()
            .or(engine.config().default_destination)
            .ok_or(SessionError::NoDefaultDestination)
    }
}

/// Await `call`, bounded by `limit`, flattening errors into text.
async fn bounded<T, E, F>(limit: Option<Duration>, call: F) -> Result<T, String>
where
    E: fmt::Display,
    F: Future<Output = Result<T, E>>,
{
    let result = match limit {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => return Err(format!("timed out after {limit:?}")),
        },
        None => call.await,
    };
    result.map_err(|e| e.to_string())
}
