//! Topic registry abstraction.
//!
//! Maps `(destination, topic name)` to the thread a collaborator created for
//! it. The engine consults the registry before every creation, which is what
//! guarantees a name is never created twice for the same destination.
//!
//! The trait is synchronous, like the rest of the core. A durable backend can
//! be swapped in without touching [`crate::SessionEngine`].

mod memory;

pub use memory::MemoryTopicRegistry;

use crate::{DestinationId, RegistryError, TopicName, TopicRef};

/// Append-only store of known topics.
pub trait TopicRegistry: Send {
    /// Look up a topic by normalized name.
    ///
    /// Returns `None` if the name was never registered for `destination`.
    fn get(
        &self,
        destination: DestinationId,
        name: &TopicName,
    ) -> Result<Option<TopicRef>, RegistryError>;

    /// Register a newly created topic.
    ///
    /// # Invariants
    ///
    /// - Pre: `topic.name` is not yet registered for `destination`
    /// - Post: `get(destination, &topic.name)` returns `topic`
    ///
    /// Registering an existing name fails with [`RegistryError::Conflict`]
    /// and leaves the existing entry in place.
    fn put(&mut self, destination: DestinationId, topic: TopicRef) -> Result<(), RegistryError>;

    /// All topics registered for `destination`, sorted by name.
    fn list(&self, destination: DestinationId) -> Result<Vec<TopicRef>, RegistryError>;
}
