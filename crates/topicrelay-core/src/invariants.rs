//! Session invariant checking.
//!
//! Invariants are properties of a [`SessionSnapshot`] that must hold after
//! every engine operation, whatever the sequence of inputs. Property tests
//! run [`InvariantSet::standard`] after each step.

use std::fmt;

use crate::{SessionSnapshot, SessionState};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Invariant violation with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property that must hold for every session snapshot.
pub trait Invariant: Send + Sync {
    /// Invariant name for error reporting.
    fn name(&self) -> &'static str;

    /// Check the invariant against a snapshot.
    fn check(&self, session: &SessionSnapshot) -> InvariantResult;
}

/// Queue holds items only while a topic is bound.
pub struct QueueOnlyWhenActive;

impl Invariant for QueueOnlyWhenActive {
    fn name(&self) -> &'static str {
        "queue_only_when_active"
    }

    fn check(&self, session: &SessionSnapshot) -> InvariantResult {
        if !session.queued.is_empty() && session.state != SessionState::Active {
            return Err(Violation {
                invariant: self.name(),
                message: format!("{} item(s) queued while {}", session.queued.len(), session.state),
            });
        }
        Ok(())
    }
}

/// An active session has both a destination and a topic.
pub struct ActiveIsBound;

impl Invariant for ActiveIsBound {
    fn name(&self) -> &'static str {
        "active_is_bound"
    }

    fn check(&self, session: &SessionSnapshot) -> InvariantResult {
        if session.state == SessionState::Active
            && (session.destination.is_none() || session.topic.is_none())
        {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "active with destination {:?} and topic {:?}",
                    session.destination, session.topic
                ),
            });
        }
        Ok(())
    }
}

/// An idle session is in its initial shape.
pub struct IdleIsPristine;

impl Invariant for IdleIsPristine {
    fn name(&self) -> &'static str {
        "idle_is_pristine"
    }

    fn check(&self, session: &SessionSnapshot) -> InvariantResult {
        if session.state == SessionState::Idle && !session.is_pristine() {
            return Err(Violation {
                invariant: self.name(),
                message: format!("idle session carries state: {session:?}"),
            });
        }
        Ok(())
    }
}

/// Topics are bound only once active, and creation is only pending while
/// waiting for a topic name.
pub struct TopicMatchesState;

impl Invariant for TopicMatchesState {
    fn name(&self) -> &'static str {
        "topic_matches_state"
    }

    fn check(&self, session: &SessionSnapshot) -> InvariantResult {
        if session.topic.is_some() && session.state != SessionState::Active {
            return Err(Violation {
                invariant: self.name(),
                message: format!("topic bound while {}", session.state),
            });
        }
        if session.pending_topic.is_some() && session.state != SessionState::AwaitingTopicName {
            return Err(Violation {
                invariant: self.name(),
                message: format!("creation pending while {}", session.state),
            });
        }
        if session.state != SessionState::Idle && session.destination.is_none() {
            return Err(Violation {
                invariant: self.name(),
                message: format!("no destination while {}", session.state),
            });
        }
        Ok(())
    }
}

/// Set of invariants to check together.
pub struct InvariantSet {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantSet {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a set with every session invariant.
    pub fn standard() -> Self {
        let mut set = Self::new();
        set.add(QueueOnlyWhenActive);
        set.add(ActiveIsBound);
        set.add(IdleIsPristine);
        set.add(TopicMatchesState);
        set
    }

    /// Add an invariant to the set.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check every invariant, collecting all violations.
    pub fn check_all(&self, session: &SessionSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(session).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Number of invariants in the set.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
