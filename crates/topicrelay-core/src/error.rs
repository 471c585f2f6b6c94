//! Error types for the session engine.
//!
//! Every error resolves to a well-defined session state: nothing here is
//! fatal to the process. Per-item delivery failures are not errors at all,
//! they are collected into [`crate::DeliveryReport`].

use thiserror::Error;

use crate::{DestinationId, SessionState, TopicName};

/// Errors returned by [`crate::SessionEngine`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Actor is not the configured operator. Session untouched.
    #[error("not authorized")]
    Unauthorized,

    /// Operation is not valid in the current state. Session untouched.
    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        /// State when the operation was attempted
        state: SessionState,
        /// Operation that was attempted
        operation: &'static str,
    },

    /// Commit requested with nothing queued. Session stays active.
    #[error("queue is empty, nothing to commit")]
    EmptyQueue,

    /// Inbound content matched no deliverable kind.
    #[error("unsupported content: {description}")]
    UnsupportedContent {
        /// What the transport saw instead
        description: String,
    },

    /// Topic name was blank after normalization.
    #[error("topic name is empty")]
    EmptyTopicName,

    /// Topic is not registered for the destination.
    #[error("topic {name} does not exist in destination {destination}")]
    UnknownTopic {
        /// Destination that was searched
        destination: DestinationId,
        /// Normalized name that was not found
        name: TopicName,
    },

    /// Destination is not on the allow-list.
    #[error("destination {0} is not allowed")]
    DestinationNotAllowed(DestinationId),

    /// Upload started without a destination and none is configured.
    #[error("no default destination configured")]
    NoDefaultDestination,

    /// Collaborator failed to create the topic. Session reset to idle.
    #[error("failed to create topic {name} in destination {destination}: {reason}")]
    TopicCreationFailed {
        /// Destination the topic was created in
        destination: DestinationId,
        /// Name of the abandoned topic
        name: TopicName,
        /// Collaborator error summary
        reason: String,
    },

    /// Collaborator created the topic but registering it failed. Session
    /// reset to idle.
    #[error("created topic {name} in destination {destination} but could not register it: {source}")]
    TopicRegistrationFailed {
        /// Destination the topic was created in
        destination: DestinationId,
        /// Name of the unregistered topic
        name: TopicName,
        /// Registry failure
        source: RegistryError,
    },

    /// Topic registry backend failed. Session untouched.
    #[error("topic registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Coarse classification of a [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Actor failed authorization. Report tersely.
    Unauthorized,
    /// Operation rejected locally without mutation.
    InvalidTransition,
    /// Topic creation failed and the session was reset.
    TopicCreationFailed,
    /// Registry storage failed.
    Registry,
}

impl SessionError {
    /// Taxonomy bucket of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized => ErrorCategory::Unauthorized,
            Self::InvalidTransition { .. }
            | Self::EmptyQueue
            | Self::UnsupportedContent { .. }
            | Self::EmptyTopicName
            | Self::UnknownTopic { .. }
            | Self::DestinationNotAllowed(_)
            | Self::NoDefaultDestination => ErrorCategory::InvalidTransition,
            Self::TopicCreationFailed { .. } => ErrorCategory::TopicCreationFailed,
            Self::TopicRegistrationFailed { .. } | Self::Registry(_) => ErrorCategory::Registry,
        }
    }

    /// Returns true if the session was reset to idle by this error.
    pub fn resets_session(&self) -> bool {
        matches!(self, Self::TopicCreationFailed { .. } | Self::TopicRegistrationFailed { .. })
    }
}

/// Errors from a [`crate::TopicRegistry`] backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Name already registered. The registry is append-only.
    #[error("topic {name} already registered for destination {destination}")]
    Conflict {
        /// Destination of the existing entry
        destination: DestinationId,
        /// Name of the existing entry
        name: TopicName,
    },

    /// Backend-specific failure (I/O, serialization, ...).
    #[error("registry backend failure: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_message_is_terse() {
        assert_eq!(SessionError::Unauthorized.to_string(), "not authorized");
    }

    #[test]
    fn invalid_transition_names_state_and_operation() {
        let err = SessionError::InvalidTransition { state: SessionState::Idle, operation: "commit" };
        assert_eq!(err.to_string(), "cannot commit while idle");
    }

    #[test]
    fn local_rejections_share_a_category() {
        assert_eq!(SessionError::EmptyQueue.category(), ErrorCategory::InvalidTransition);
        assert_eq!(SessionError::EmptyTopicName.category(), ErrorCategory::InvalidTransition);
        assert_eq!(
            SessionError::DestinationNotAllowed(DestinationId(1)).category(),
            ErrorCategory::InvalidTransition
        );
    }

    #[test]
    fn only_failures_that_close_the_session_reset() {
        let name = TopicName::normalize("x", crate::TopicCase::Upper);
        let Some(name) = name else { panic!("name should normalize") };
        let failed = SessionError::TopicCreationFailed {
            destination: DestinationId(1),
            name,
            reason: "boom".into(),
        };

        let unregistered = SessionError::TopicRegistrationFailed {
            destination: DestinationId(1),
            name: match failed {
                SessionError::TopicCreationFailed { ref name, .. } => name.clone(),
                _ => panic!("built above"),
            },
            source: RegistryError::Backend("disk full".into()),
        };
        let lookup = SessionError::Registry(RegistryError::Backend("disk full".into()));

        assert!(failed.resets_session());
        assert!(unregistered.resets_session());
        assert_eq!(unregistered.category(), ErrorCategory::Registry);
        assert!(!lookup.resets_session());
        assert!(!SessionError::EmptyQueue.resets_session());
        assert!(!SessionError::Unauthorized.resets_session());
    }
}
