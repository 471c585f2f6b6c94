//! Operator-facing rendering of relay outcomes.

use std::fmt;

use topicrelay_core::{
    Accepted, Cancelled, ContentKind, DeliveryReport, DestinationId, KindCounts, SessionError,
    SessionSnapshot, SessionState, TopicRef,
};

use crate::CommandError;

const HELP: [&str; 10] = [
    "/upload [destination] - open an upload session",
    "/topics - list topics of the destination",
    "/topic <name> - choose an existing topic",
    "/newtopic [name] - create a topic",
    "any other message - queue it, or name the topic when asked",
    "/done - deliver the queue in order",
    "/cancel - discard the session",
    "/status - show the session",
    "/help - show this message",
    "/start - greeting",
];

/// Text sent back to the operator, one entry per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    lines: Vec<String>,
}

impl Reply {
    /// Single-line reply.
    pub fn line(text: impl Into<String>) -> Self {
        Self { lines: vec![text.into()] }
    }

    /// Append a line.
    #[must_use]
    pub fn with_line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    /// Lines in display order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Check if there is nothing to send.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Reply to `/start`.
    pub fn greeting() -> Self {
        Self::line("ready. send /upload to start a session, /help for commands")
    }

    /// Reply to `/help`.
    pub fn help() -> Self {
        Self { lines: HELP.iter().map(|line| (*line).to_string()).collect() }
    }

    /// Describe a failed operation.
    ///
    /// Unauthorized actors get a terse line with no session detail.
    pub fn error(error: &SessionError) -> Self {
        if matches!(error, SessionError::Unauthorized) {
            return Self::line("not authorized");
        }
        let reply = Self::line(error.to_string());
        if error.resets_session() {
            reply.with_line("session closed, send /upload to retry")
        } else {
            reply
        }
    }

    /// Describe a malformed command.
    pub fn command_error(error: &CommandError) -> Self {
        Self::line(error.to_string())
    }

    /// Describe the session, prompting for the next step.
    pub fn status(snapshot: &SessionSnapshot) -> Self {
        let destination = snapshot.destination.map_or_else(|| "?".to_string(), |d| d.to_string());

        match snapshot.state {
            SessionState::Idle => Self::line("no upload in progress, send /upload to start"),
            SessionState::AwaitingTopicSelection => Self::line(format!(
                "destination {destination}: choose a topic with /topic <name>, or /newtopic"
            )),
            SessionState::AwaitingTopicName => match &snapshot.pending_topic {
                Some(name) => Self::line(format!("destination {destination}: creating topic {name}")),
                None => Self::line(format!("destination {destination}: send the new topic name")),
            },
            SessionState::Active => {
                let topic = snapshot.topic.as_ref().map_or("?", |name| name.as_str());
                let queued = if snapshot.queued.is_empty() {
                    "nothing queued".to_string()
                } else {
                    format!("{} item(s) queued ({})", snapshot.queued.len(), tally(&snapshot.queued))
                };
                Self::line(format!("uploading to {topic} in {destination}: {queued}"))
                    .with_line("send content, then /done to deliver or /cancel to discard")
            },
        }
    }

    /// List the topics of `destination`.
    pub fn topics(destination: DestinationId, topics: &[TopicRef]) -> Self {
        if topics.is_empty() {
            return Self::line(format!("no topics in destination {destination} yet"));
        }
        let mut reply = Self::line(format!("topics in destination {destination}:"));
        for topic in topics {
            reply = reply.with_line(format!("- {}", topic.name));
        }
        reply
    }

    /// Acknowledge a queued item. Positions are shown 1-based.
    pub fn accepted(accepted: &Accepted) -> Self {
        Self::line(format!(
            "queued {} #{} ({} in queue)",
            accepted.kind,
            accepted.index + 1,
            accepted.queued
        ))
    }

    /// Acknowledge a cancel.
    pub fn cancelled(cancelled: &Cancelled) -> Self {
        if cancelled.previous == SessionState::Idle {
            return Self::line("nothing to cancel");
        }
        Self::line(format!("cancelled, discarded {} item(s)", cancelled.discarded))
    }

    /// Summarize a commit, one extra line per failed item.
    pub fn report(report: &DeliveryReport) -> Self {
        let KindCounts { texts, photos, videos, documents } = report.counts;
        let mut reply = Self::line(format!(
            "delivered {} item(s) to {}: {texts} text, {photos} photo, {videos} video, \
             {documents} document; {} failed",
            report.delivered(),
            report.topic.name,
            report.failures.len()
        ));
        for failure in &report.failures {
            reply = reply.with_line(format!(
                "#{} {}: {}",
                failure.index + 1,
                failure.kind,
                failure.error
            ));
        }
        reply
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

fn tally(kinds: &[ContentKind]) -> String {
    ContentKind::ALL
        .iter()
        .filter_map(|kind| {
            let count = kinds.iter().filter(|k| *k == kind).count();
            (count > 0).then(|| format!("{count} {kind}"))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
