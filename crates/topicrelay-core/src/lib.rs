//! Topicrelay core
//!
//! Upload-session state machine for relaying an operator's content into a
//! named topic of a destination channel, delivered as one committed batch.
//!
//! # Architecture
//!
//! The core is Sans-IO: [`SessionEngine`] consumes operator inputs and returns
//! either a new [`SessionState`] or an instruction for the caller to execute
//! against a collaborator ([`TopicStep::Create`] for topic creation,
//! [`DeliveryPlan`] for a commit). Outcomes are fed back into the engine or
//! tallied into a [`DeliveryReport`]. The same code runs under the async
//! relay and in deterministic tests.
//!
//! # Components
//!
//! - [`AccessGuard`]: single-operator authorization predicate
//! - [`SessionEngine`]: session transitions, queueing, commit and cancel
//! - [`TopicRegistry`]: `(destination, name)` to topic store, with
//!   [`MemoryTopicRegistry`] as the in-memory backend
//! - [`InboundContent`]: adapter-side description, classified once into a
//!   [`QueuedItem`]
//! - [`invariants`]: session properties checked by tests

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod content;
mod delivery;
mod engine;
mod error;
mod guard;
mod ids;
pub mod invariants;
mod registry;
mod session;
mod topic;

pub use content::{ContentKind, FormattingEntity, InboundContent, QueuedItem};
pub use delivery::{DeliveryFailure, DeliveryPlan, DeliveryReport, KindCounts};
pub use engine::{
    Accepted, Cancelled, EngineConfig, SessionEngine, TopicChoice, TopicRequest, TopicStep,
};
pub use error::{ErrorCategory, RegistryError, SessionError};
pub use guard::AccessGuard;
pub use ids::{ActorId, DestinationId, PayloadRef, ThreadId};
pub use registry::{MemoryTopicRegistry, TopicRegistry};
pub use session::{Session, SessionSnapshot, SessionState};
pub use topic::{TopicCase, TopicName, TopicRef};
