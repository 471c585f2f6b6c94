use std::collections::BTreeMap;

use super::TopicRegistry;
use crate::{DestinationId, RegistryError, ThreadId, TopicName, TopicRef};

/// In-memory topic registry.
///
/// Lives as long as the engine that owns it. Nothing is persisted across
/// restarts. Entries are ordered by destination then name, so listing is a
/// contiguous scan.
#[derive(Debug, Clone, Default)]
pub struct MemoryTopicRegistry {
    topics: BTreeMap<(DestinationId, TopicName), ThreadId>,
}

impl MemoryTopicRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of registered topics across all destinations.
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Check if no topic is registered.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

impl TopicRegistry for MemoryTopicRegistry {
    fn get(
        &self,
        destination: DestinationId,
        name: &TopicName,
    ) -> Result<Option<TopicRef>, RegistryError> {
        Ok(self
            .topics
            .get(&(destination, name.clone()))
            .map(|thread_id| TopicRef::new(name.clone(), *thread_id)))
    }

    fn put(&mut self, destination: DestinationId, topic: TopicRef) -> Result<(), RegistryError> {
        let key = (destination, topic.name);
        if self.topics.contains_key(&key) {
            return Err(RegistryError::Conflict { destination, name: key.1 });
        }

        self.topics.insert(key, topic.thread_id);
        Ok(())
    }

    fn list(&self, destination: DestinationId) -> Result<Vec<TopicRef>, RegistryError> {
        Ok(self
            .topics
            .iter()
            .filter(|((dest, _), _)| *dest == destination)
            .map(|((_, name), thread_id)| TopicRef::new(name.clone(), *thread_id))
            .collect())
    }
}
