//! Upload-session state machine.
//!
//! [`SessionEngine`] owns the one live [`Session`] and the [`TopicRegistry`].
//! It is a pure, synchronous state machine: it never talks to the network.
//! Where a transition needs a collaborator (creating a topic, delivering the
//! queue) the engine returns an instruction ([`TopicStep::Create`],
//! [`DeliveryPlan`]) and the caller executes it, feeding the result back.
//!
//! # Transitions
//!
//! ```text
//! Idle ── select_destination ──► AwaitingTopicSelection
//! AwaitingTopicSelection ── Existing(name) found ──► Active
//! AwaitingTopicSelection ── New ──► AwaitingTopicName
//! AwaitingTopicSelection | AwaitingTopicName ── Name(name) ──► Active (known name)
//!                                                          └─► Create request
//! Create request ── topic_created ──► Active
//! Create request ── topic_creation_failed ──► Idle
//! Active ── enqueue ──► Active
//! Active ── commit (non-empty) ──► Idle + DeliveryPlan
//! any ── cancel ──► Idle
//! ```
//!
//! # Serialization
//!
//! Every method takes `&mut self`, so owners must serialize access (the app
//! layer keeps the engine behind an async mutex held for a whole transition,
//! including the collaborator calls it triggers).

use tracing::{debug, info, warn};

use crate::{
    AccessGuard, ActorId, ContentKind, DeliveryPlan, DestinationId, InboundContent,
    MemoryTopicRegistry, QueuedItem, Session, SessionError, SessionSnapshot, SessionState,
    ThreadId, TopicCase, TopicName, TopicRef, TopicRegistry,
};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// The single authorized operator.
    pub operator: ActorId,
    /// Destination used by [`SessionEngine::start_upload`].
    pub default_destination: Option<DestinationId>,
    /// Destinations the operator may select. Empty admits any destination.
    pub allowed_destinations: Vec<DestinationId>,
    /// Case policy for topic names.
    pub topic_case: TopicCase,
}

impl EngineConfig {
    /// Configuration for `operator` with no fixed destination.
    pub fn new(operator: ActorId) -> Self {
        Self {
            operator,
            default_destination: None,
            allowed_destinations: Vec::new(),
            topic_case: TopicCase::default(),
        }
    }

    /// Set the fixed destination used when none is chosen explicitly.
    #[must_use]
    pub fn with_default_destination(mut self, destination: DestinationId) -> Self {
        self.default_destination = Some(destination);
        self
    }

    /// Add a destination to the allow-list.
    ///
    /// An empty allow-list admits every destination. The default destination
    /// is always admitted.
    #[must_use]
    pub fn allow_destination(mut self, destination: DestinationId) -> Self {
        self.allowed_destinations.push(destination);
        self
    }

    /// Set the topic name case policy.
    #[must_use]
    pub fn with_topic_case(mut self, topic_case: TopicCase) -> Self {
        self.topic_case = topic_case;
        self
    }

    fn admits(&self, destination: DestinationId) -> bool {
        self.allowed_destinations.is_empty()
            || self.default_destination == Some(destination)
            || self.allowed_destinations.contains(&destination)
    }
}

/// Operator's answer to "which topic?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicChoice {
    /// Pick an already registered topic. Fails if the name is unknown.
    Existing(String),
    /// Ask to create a new topic; the name follows separately.
    New,
    /// Select the named topic, creating it if it is not registered yet.
    Name(String),
}

/// Result of a topic choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicStep {
    /// Transition complete; the session is now in this state.
    Ready(SessionState),
    /// The topic must be created by the collaborator. Report the outcome
    /// with [`SessionEngine::topic_created`] or
    /// [`SessionEngine::topic_creation_failed`].
    Create(TopicRequest),
}

/// Instruction to create a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRequest {
    /// Destination to create the topic in.
    pub destination: DestinationId,
    /// Normalized topic name.
    pub name: TopicName,
}

/// Acknowledgement of a queued item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    /// Queue position of the new item.
    pub index: usize,
    /// Kind the item was classified as.
    pub kind: ContentKind,
    /// Queue length after the append.
    pub queued: usize,
}

/// Acknowledgement of a cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled {
    /// State the session was in before the cancel.
    pub previous: SessionState,
    /// Number of queued items discarded.
    pub discarded: usize,
}

impl Cancelled {
    /// State after the cancel. Always [`SessionState::Idle`].
    pub fn state(&self) -> SessionState {
        SessionState::Idle
    }
}

/// Upload-session state machine.
///
/// Generic over the registry backend; defaults to [`MemoryTopicRegistry`].
#[derive(Debug)]
pub struct SessionEngine<R: TopicRegistry = MemoryTopicRegistry> {
    guard: AccessGuard,
    config: EngineConfig,
    session: Session,
    registry: R,
}

impl SessionEngine<MemoryTopicRegistry> {
    /// Create an engine with an empty in-memory registry.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_registry(config, MemoryTopicRegistry::new())
    }
}

impl<R: TopicRegistry> SessionEngine<R> {
    /// Create an engine over the given registry.
    pub fn with_registry(config: EngineConfig, registry: R) -> Self {
        Self { guard: AccessGuard::new(config.operator), config, session: Session::new(), registry }
    }

    /// Check whether `actor` may drive the session.
    pub fn is_authorized(&self, actor: ActorId) -> bool {
        self.guard.is_authorized(actor)
    }

    /// Bind `destination` and wait for a topic choice.
    ///
    /// Valid only while idle.
    pub fn select_destination(
        &mut self,
        actor: ActorId,
        destination: DestinationId,
    ) -> Result<SessionState, SessionError> {
        self.authorize(actor)?;
        self.require(SessionState::Idle, "select a destination")?;
        if !self.config.admits(destination) {
            return Err(SessionError::DestinationNotAllowed(destination));
        }

        self.session.bind_destination(destination);
        debug!(%destination, "destination selected");
        Ok(self.session.state())
    }

    /// Bind the configured default destination.
    pub fn start_upload(&mut self, actor: ActorId) -> Result<SessionState, SessionError> {
        self.authorize(actor)?;
        let destination =
            self.config.default_destination.ok_or(SessionError::NoDefaultDestination)?;
        self.select_destination(actor, destination)
    }

    /// Apply the operator's topic choice.
    ///
    /// A known name always resolves from the registry, so the collaborator is
    /// asked to create a given name at most once per destination.
    pub fn select_topic(
        &mut self,
        actor: ActorId,
        choice: TopicChoice,
    ) -> Result<TopicStep, SessionError> {
        self.authorize(actor)?;

        match choice {
            TopicChoice::New => {
                self.require(SessionState::AwaitingTopicSelection, "request a new topic")?;
                self.session.await_topic_name();
                debug!("awaiting new topic name");
                Ok(TopicStep::Ready(self.session.state()))
            },
            TopicChoice::Existing(raw) => {
                self.require(SessionState::AwaitingTopicSelection, "choose a topic")?;
                let destination = self.bound_destination("choose a topic")?;
                let name = self.normalize(&raw)?;

                match self.registry.get(destination, &name)? {
                    Some(topic) => Ok(TopicStep::Ready(self.activate(topic))),
                    None => Err(SessionError::UnknownTopic { destination, name }),
                }
            },
            TopicChoice::Name(raw) => {
                let naming = matches!(
                    self.session.state(),
                    SessionState::AwaitingTopicSelection | SessionState::AwaitingTopicName
                );
                if !naming || self.session.pending_topic().is_some() {
                    return Err(self.invalid("name a topic"));
                }
                let destination = self.bound_destination("name a topic")?;
                let name = self.normalize(&raw)?;

                if let Some(topic) = self.registry.get(destination, &name)? {
                    return Ok(TopicStep::Ready(self.activate(topic)));
                }

                debug!(%destination, topic = %name, "topic creation requested");
                self.session.set_pending_topic(name.clone());
                Ok(TopicStep::Create(TopicRequest { destination, name }))
            },
        }
    }

    /// Complete a pending topic creation with the thread the collaborator
    /// assigned.
    ///
    /// The topic is registered before it is bound. If registration fails the
    /// session resets to idle with [`SessionError::TopicRegistrationFailed`].
    pub fn topic_created(&mut self, thread_id: ThreadId) -> Result<SessionState, SessionError> {
        let Some(destination) = self.session.destination() else {
            return Err(self.invalid("complete topic creation"));
        };
        if self.session.state() != SessionState::AwaitingTopicName {
            return Err(self.invalid("complete topic creation"));
        }
        let Some(name) = self.session.take_pending_topic() else {
            return Err(self.invalid("complete topic creation"));
        };

        let topic = TopicRef::new(name, thread_id);
        if let Err(e) = self.registry.put(destination, topic.clone()) {
            warn!(%destination, topic = %topic.name, error = %e, "failed to register topic");
            self.session.reset();
            return Err(SessionError::TopicRegistrationFailed {
                destination,
                name: topic.name,
                source: e,
            });
        }

        info!(%destination, topic = %topic.name, thread = %thread_id, "topic created");
        Ok(self.activate(topic))
    }

    /// Abandon a pending topic creation and reset to idle.
    ///
    /// Returns the error to surface to the operator. No retry is attempted.
    pub fn topic_creation_failed(&mut self, reason: impl Into<String>) -> SessionError {
        let destination = self.session.destination();
        let name = self.session.take_pending_topic();

        match (destination, name) {
            (Some(destination), Some(name)) => {
                let reason = reason.into();
                warn!(%destination, topic = %name, %reason, "topic creation failed");
                self.session.reset();
                SessionError::TopicCreationFailed { destination, name, reason }
            },
            _ => self.invalid("fail topic creation"),
        }
    }

    /// Append a classified item to the queue.
    pub fn enqueue(&mut self, actor: ActorId, item: QueuedItem) -> Result<Accepted, SessionError> {
        self.authorize(actor)?;
        self.require(SessionState::Active, "queue content")?;
        Ok(self.push(item))
    }

    /// Classify inbound content and append it to the queue.
    ///
    /// Content outside an active session is an invalid transition; content
    /// of no supported kind is rejected. Neither mutates the session.
    pub fn accept(
        &mut self,
        actor: ActorId,
        content: InboundContent,
    ) -> Result<Accepted, SessionError> {
        self.authorize(actor)?;
        self.require(SessionState::Active, "queue content")?;
        let item = content.classify()?;
        Ok(self.push(item))
    }

    /// Drain the queue into a delivery plan and reset to idle.
    ///
    /// An empty queue is rejected and the session stays active.
    pub fn commit(&mut self, actor: ActorId) -> Result<DeliveryPlan, SessionError> {
        self.authorize(actor)?;
        self.require(SessionState::Active, "commit")?;
        if self.session.queue().is_empty() {
            return Err(SessionError::EmptyQueue);
        }
        let destination = self.bound_destination("commit")?;
        let Some(topic) = self.session.topic().cloned() else {
            return Err(self.invalid("commit"));
        };

        let items = self.session.take_queue();
        self.session.reset();

        info!(%destination, topic = %topic.name, items = items.len(), "committing queue");
        Ok(DeliveryPlan::new(destination, topic, items))
    }

    /// Discard everything and return to idle. Valid from every state.
    pub fn cancel(&mut self, actor: ActorId) -> Result<Cancelled, SessionError> {
        self.authorize(actor)?;

        let cancelled =
            Cancelled { previous: self.session.state(), discarded: self.session.queue().len() };
        self.session.reset();

        debug!(previous = %cancelled.previous, discarded = cancelled.discarded, "session cancelled");
        Ok(cancelled)
    }

    /// Registered topics of `destination`, sorted by name.
    pub fn topics(
        &self,
        actor: ActorId,
        destination: DestinationId,
    ) -> Result<Vec<TopicRef>, SessionError> {
        self.authorize(actor)?;
        Ok(self.registry.list(destination)?)
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// The live session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Observable copy of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Topic registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    fn authorize(&self, actor: ActorId) -> Result<(), SessionError> {
        if self.guard.is_authorized(actor) {
            Ok(())
        } else {
            debug!(%actor, "unauthorized actor rejected");
            Err(SessionError::Unauthorized)
        }
    }

    fn require(&self, state: SessionState, operation: &'static str) -> Result<(), SessionError> {
        if self.session.state() == state { Ok(()) } else { Err(self.invalid(operation)) }
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidTransition { state: self.session.state(), operation }
    }

    fn bound_destination(&self, operation: &'static str) -> Result<DestinationId, SessionError> {
        self.session.destination().ok_or_else(|| self.invalid(operation))
    }

    fn normalize(&self, raw: &str) -> Result<TopicName, SessionError> {
        TopicName::normalize(raw, self.config.topic_case).ok_or(SessionError::EmptyTopicName)
    }

    fn activate(&mut self, topic: TopicRef) -> SessionState {
        debug!(topic = %topic, "topic bound");
        self.session.activate(topic);
        self.session.state()
    }

    fn push(&mut self, item: QueuedItem) -> Accepted {
        let kind = item.kind();
        let index = self.session.push(item);
        debug!(index, %kind, "content queued");
        Accepted { index, kind, queued: index + 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorCategory, PayloadRef, RegistryError};

    const OPERATOR: ActorId = ActorId(42);
    const STRANGER: ActorId = ActorId(7);
    const DEST: DestinationId = DestinationId(-100);

    fn engine() -> SessionEngine {
        SessionEngine::new(EngineConfig::new(OPERATOR))
    }

    fn active_engine(topic: &str) -> SessionEngine {
        let mut engine = engine();
        let _ = engine.select_destination(OPERATOR, DEST);
        let _ = engine.select_topic(OPERATOR, TopicChoice::Name(topic.into()));
        let _ = engine.topic_created(ThreadId(1));
        engine
    }

    #[test]
    fn select_destination_moves_to_topic_selection() {
        let mut engine = engine();

        assert_eq!(
            engine.select_destination(OPERATOR, DEST),
            Ok(SessionState::AwaitingTopicSelection)
        );
        assert_eq!(engine.session().destination(), Some(DEST));
    }

    #[test]
    fn select_destination_twice_is_invalid() {
        let mut engine = engine();
        let _ = engine.select_destination(OPERATOR, DEST);

        let result = engine.select_destination(OPERATOR, DestinationId(1));

        assert!(matches!(result, Err(SessionError::InvalidTransition { .. })));
        assert_eq!(engine.session().destination(), Some(DEST));
    }

    #[test]
    fn disallowed_destination_is_rejected_without_mutation() {
        let config = EngineConfig::new(OPERATOR).allow_destination(DEST);
        let mut engine = SessionEngine::new(config);

        let result = engine.select_destination(OPERATOR, DestinationId(5));

        assert_eq!(result, Err(SessionError::DestinationNotAllowed(DestinationId(5))));
        assert!(engine.snapshot().is_pristine());
    }

    #[test]
    fn start_upload_uses_default_destination() {
        let config = EngineConfig::new(OPERATOR).with_default_destination(DEST);
        let mut engine = SessionEngine::new(config);

        assert_eq!(engine.start_upload(OPERATOR), Ok(SessionState::AwaitingTopicSelection));
        assert_eq!(engine.session().destination(), Some(DEST));
    }

    #[test]
    fn start_upload_without_default_fails() {
        let mut engine = engine();
        assert_eq!(engine.start_upload(OPERATOR), Err(SessionError::NoDefaultDestination));
    }

    #[test]
    fn new_topic_flow_requests_creation() {
        let mut engine = engine();
        let _ = engine.select_destination(OPERATOR, DEST);

        assert_eq!(
            engine.select_topic(OPERATOR, TopicChoice::New),
            Ok(TopicStep::Ready(SessionState::AwaitingTopicName))
        );

        let step = engine.select_topic(OPERATOR, TopicChoice::Name("Algebra".into()));
        let Ok(TopicStep::Create(request)) = step else { panic!("expected create: {step:?}") };
        assert_eq!(request.destination, DEST);
        assert_eq!(request.name.as_str(), "ALGEBRA");

        assert_eq!(engine.topic_created(ThreadId(9)), Ok(SessionState::Active));
        assert_eq!(engine.session().topic().map(|t| t.thread_id), Some(ThreadId(9)));
    }

    #[test]
    fn blank_topic_name_is_rejected() {
        let mut engine = engine();
        let _ = engine.select_destination(OPERATOR, DEST);
        let _ = engine.select_topic(OPERATOR, TopicChoice::New);

        let result = engine.select_topic(OPERATOR, TopicChoice::Name("   ".into()));

        assert_eq!(result, Err(SessionError::EmptyTopicName));
        assert_eq!(engine.state(), SessionState::AwaitingTopicName);
    }

    #[test]
    fn existing_unknown_topic_leaves_state() {
        let mut engine = engine();
        let _ = engine.select_destination(OPERATOR, DEST);

        let result = engine.select_topic(OPERATOR, TopicChoice::Existing("nope".into()));

        assert!(matches!(result, Err(SessionError::UnknownTopic { .. })));
        assert_eq!(engine.state(), SessionState::AwaitingTopicSelection);
    }

    #[test]
    fn second_name_while_creation_pending_is_invalid() {
        let mut engine = engine();
        let _ = engine.select_destination(OPERATOR, DEST);
        let _ = engine.select_topic(OPERATOR, TopicChoice::Name("a".into()));

        let result = engine.select_topic(OPERATOR, TopicChoice::Name("b".into()));

        assert!(matches!(result, Err(SessionError::InvalidTransition { .. })));
        assert_eq!(engine.session().pending_topic().map(TopicName::as_str), Some("A"));
    }

    #[test]
    fn topic_creation_failure_resets_to_idle() {
        let mut engine = engine();
        let _ = engine.select_destination(OPERATOR, DEST);
        let _ = engine.select_topic(OPERATOR, TopicChoice::Name("algebra".into()));

        let err = engine.topic_creation_failed("forbidden");

        assert!(matches!(err, SessionError::TopicCreationFailed { ref reason, .. } if reason == "forbidden"));
        assert!(engine.snapshot().is_pristine());
        assert!(engine.registry().is_empty());
    }

    struct RejectingRegistry;

    impl TopicRegistry for RejectingRegistry {
        fn get(&self, _: DestinationId, _: &TopicName) -> Result<Option<TopicRef>, RegistryError> {
            Ok(None)
        }

        fn put(&mut self, _: DestinationId, _: TopicRef) -> Result<(), RegistryError> {
            Err(RegistryError::Backend("disk full".into()))
        }

        fn list(&self, _: DestinationId) -> Result<Vec<TopicRef>, RegistryError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn failed_registration_resets_to_idle() {
        let mut engine = SessionEngine::with_registry(EngineConfig::new(OPERATOR), RejectingRegistry);
        let _ = engine.select_destination(OPERATOR, DEST);
        let _ = engine.select_topic(OPERATOR, TopicChoice::Name("algebra".into()));

        let Err(err) = engine.topic_created(ThreadId(4)) else {
            panic!("registration should fail");
        };

        assert!(matches!(
            err,
            SessionError::TopicRegistrationFailed { destination: DEST, ref name, .. }
                if name.as_str() == "ALGEBRA"
        ));
        assert_eq!(err.category(), ErrorCategory::Registry);
        assert!(err.resets_session());
        assert!(engine.snapshot().is_pristine());
    }

    #[test]
    fn topic_created_without_request_is_invalid() {
        let mut engine = engine();
        assert!(matches!(
            engine.topic_created(ThreadId(1)),
            Err(SessionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn content_while_idle_is_invalid() {
        let mut engine = engine();

        let result = engine.accept(OPERATOR, InboundContent::text("hello"));

        assert_eq!(
            result,
            Err(SessionError::InvalidTransition {
                state: SessionState::Idle,
                operation: "queue content"
            })
        );
    }

    #[test]
    fn unsupported_content_is_rejected_while_active() {
        let mut engine = active_engine("algebra");

        let result = engine.accept(OPERATOR, InboundContent::unsupported("sticker"));

        assert!(matches!(result, Err(SessionError::UnsupportedContent { .. })));
        assert!(engine.session().queue().is_empty());
    }

    #[test]
    fn accept_reports_position() {
        let mut engine = active_engine("algebra");

        let first = engine.accept(OPERATOR, InboundContent::text("one"));
        let second = engine.accept(OPERATOR, InboundContent::photo("pic"));

        assert_eq!(first, Ok(Accepted { index: 0, kind: ContentKind::Text, queued: 1 }));
        assert_eq!(second, Ok(Accepted { index: 1, kind: ContentKind::Photo, queued: 2 }));
    }

    #[test]
    fn enqueue_keeps_call_order() {
        let mut engine = active_engine("algebra");
        let items = [
            QueuedItem::text("first", Vec::new()),
            QueuedItem::document(PayloadRef::new("doc"), Some("notes".into()), Vec::new()),
            QueuedItem::text("third", Vec::new()),
        ];

        for (index, item) in items.iter().enumerate() {
            let accepted = engine.enqueue(OPERATOR, item.clone());
            assert_eq!(accepted.map(|a| a.index), Ok(index));
        }

        assert_eq!(engine.session().queue(), &items[..]);
        let Ok(plan) = engine.commit(OPERATOR) else { panic!("commit should succeed") };
        assert_eq!(plan.items(), &items[..]);
    }

    #[test]
    fn enqueue_while_idle_is_invalid() {
        let mut engine = engine();

        let result = engine.enqueue(OPERATOR, QueuedItem::text("hello", Vec::new()));

        assert_eq!(
            result,
            Err(SessionError::InvalidTransition {
                state: SessionState::Idle,
                operation: "queue content"
            })
        );
        assert!(engine.snapshot().is_pristine());
    }

    #[test]
    fn stranger_cannot_enqueue() {
        let mut engine = active_engine("algebra");
        let before = engine.snapshot();

        let result = engine.enqueue(STRANGER, QueuedItem::text("spam", Vec::new()));

        assert_eq!(result, Err(SessionError::Unauthorized));
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn commit_empty_queue_stays_active() {
        let mut engine = active_engine("algebra");

        assert_eq!(engine.commit(OPERATOR), Err(SessionError::EmptyQueue));
        assert_eq!(engine.state(), SessionState::Active);
    }

    #[test]
    fn commit_drains_queue_and_resets() {
        let mut engine = active_engine("algebra");
        let _ = engine.accept(OPERATOR, InboundContent::text("one"));
        let _ = engine.accept(OPERATOR, InboundContent::video("vid"));

        let plan = engine.commit(OPERATOR);

        let Ok(plan) = plan else { panic!("commit should succeed") };
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.destination(), DEST);
        assert_eq!(plan.topic().name.as_str(), "ALGEBRA");
        assert!(engine.snapshot().is_pristine());
    }

    #[test]
    fn cancel_reports_discarded_items() {
        let mut engine = active_engine("algebra");
        let _ = engine.accept(OPERATOR, InboundContent::text("one"));

        let cancelled = engine.cancel(OPERATOR);

        assert_eq!(cancelled, Ok(Cancelled { previous: SessionState::Active, discarded: 1 }));
        assert!(engine.snapshot().is_pristine());
    }

    #[test]
    fn stranger_cannot_cancel() {
        let mut engine = active_engine("algebra");
        let _ = engine.accept(OPERATOR, InboundContent::text("one"));
        let before = engine.snapshot();

        assert_eq!(engine.cancel(STRANGER), Err(SessionError::Unauthorized));
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn registry_survives_sessions() {
        let mut engine = active_engine("algebra");
        let _ = engine.cancel(OPERATOR);
        let _ = engine.select_destination(OPERATOR, DEST);

        let step = engine.select_topic(OPERATOR, TopicChoice::Existing("ALGEBRA".into()));

        assert_eq!(step, Ok(TopicStep::Ready(SessionState::Active)));
        assert_eq!(engine.topics(OPERATOR, DEST).map(|t| t.len()), Ok(1));
    }
}
