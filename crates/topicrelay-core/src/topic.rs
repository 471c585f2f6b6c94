//! Topic names and references.
//!
//! A topic is a named thread inside a destination. Names are normalized once
//! at the engine boundary so that registry lookups, creation requests and
//! reports all agree on a single spelling.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ThreadId;

/// Case policy applied when normalizing topic names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TopicCase {
    /// Keep the operator's spelling.
    Preserve,
    /// Upper-case every name, so `algebra` and `ALGEBRA` are one topic.
    #[default]
    Upper,
}

/// Normalized topic name.
///
/// Never empty. Leading and trailing whitespace is removed and inner
/// whitespace runs collapse to a single space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicName(String);

impl TopicName {
    /// Normalize a raw name. `None` if nothing but whitespace remains.
    pub fn normalize(raw: &str, case: TopicCase) -> Option<Self> {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            return None;
        }

        let name = match case {
            TopicCase::Preserve => collapsed,
            TopicCase::Upper => collapsed.to_uppercase(),
        };
        Some(Self(name))
    }

    /// Name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle identifying a topic within a destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicRef {
    /// Normalized topic name.
    pub name: TopicName,
    /// Thread the collaborator assigned when the topic was created.
    pub thread_id: ThreadId,
}

impl TopicRef {
    /// Create a topic reference.
    pub fn new(name: TopicName, thread_id: ThreadId) -> Self {
        Self { name, thread_id }
    }
}

impl fmt::Display for TopicRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (thread {})", self.name, self.thread_id)
    }
}
