//! Operator authorization.

use crate::ActorId;

/// Stateless predicate deciding whether an actor may drive the session.
///
/// Exactly one operator is configured. Every engine operation consults the
/// guard before touching the session, so a denied actor can never mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessGuard {
    operator: ActorId,
}

impl AccessGuard {
    /// Create a guard admitting only `operator`.
    pub const fn new(operator: ActorId) -> Self {
        Self { operator }
    }

    /// Check whether `actor` is the configured operator.
    pub fn is_authorized(&self, actor: ActorId) -> bool {
        actor == self.operator
    }

    /// The configured operator.
    pub fn operator(&self) -> ActorId {
        self.operator
    }
}
