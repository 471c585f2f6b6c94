//! Operator command parsing.
//!
//! Commands are slash-prefixed text messages. Anything else is content, or
//! a topic name while the session waits for one.

use thiserror::Error;
use topicrelay_core::DestinationId;

/// Parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start`: greeting.
    Start,
    /// `/help`: command summary.
    Help,
    /// `/upload [destination]`: open an upload session.
    Upload {
        /// Explicit destination, or the configured default when absent.
        destination: Option<DestinationId>,
    },
    /// `/topics`: list topics of the bound or default destination.
    Topics,
    /// `/topic <name>`: choose an existing topic.
    Topic {
        /// Topic name as typed.
        name: String,
    },
    /// `/newtopic [name]`: create a topic, optionally naming it right away.
    NewTopic {
        /// Topic name as typed.
        name: Option<String>,
    },
    /// `/done` or `/commit`: deliver the queue.
    Done,
    /// `/cancel`: discard the session.
    Cancel,
    /// `/status`: describe the session.
    Status,
}

/// Errors from [`Command::parse`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Slash command that is not recognized.
    #[error("unknown command /{0}, try /help")]
    Unknown(String),

    /// Recognized command with unusable arguments.
    #[error("usage: {usage}")]
    InvalidArgs {
        /// Expected form of the command
        usage: &'static str,
    },
}

impl Command {
    /// Parse a text message.
    ///
    /// Returns `None` if the text is not a command. A `@botname` suffix on
    /// the command word is ignored.
    pub fn parse(text: &str) -> Option<Result<Self, CommandError>> {
        let rest = text.trim_start().strip_prefix('/')?;
        let (word, args) = match rest.split_once(char::is_whitespace) {
            Some((word, args)) => (word, args.trim()),
            None => (rest, ""),
        };
        let word = word.split_once('@').map_or(word, |(word, _)| word);

        Some(Self::parse_word(&word.to_ascii_lowercase(), args))
    }

    fn parse_word(word: &str, args: &str) -> Result<Self, CommandError> {
        match word {
            "start" => Ok(Self::Start),
            "help" => Ok(Self::Help),
            "upload" => {
                if args.is_empty() {
                    return Ok(Self::Upload { destination: None });
                }
                let id = args
                    .parse::<i64>()
                    .map_err(|_| CommandError::InvalidArgs { usage: "/upload [destination id]" })?;
                Ok(Self::Upload { destination: Some(DestinationId(id)) })
            },
            "topics" => Ok(Self::Topics),
            "topic" => {
                if args.is_empty() {
                    return Err(CommandError::InvalidArgs { usage: "/topic <name>" });
                }
                Ok(Self::Topic { name: args.to_string() })
            },
            "newtopic" => {
                let name = (!args.is_empty()).then(|| args.to_string());
                Ok(Self::NewTopic { name })
            },
            "done" | "commit" => Ok(Self::Done),
            "cancel" => Ok(Self::Cancel),
            "status" => Ok(Self::Status),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(Command::parse("hello world"), None);
        assert_eq!(Command::parse("a/b"), None);
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(Command::parse("/upload"), Some(Ok(Command::Upload { destination: None })));
        assert_eq!(
            Command::parse("/upload -1001"),
            Some(Ok(Command::Upload { destination: Some(DestinationId(-1001)) }))
        );
        assert_eq!(
            Command::parse("/topic  Linear Algebra "),
            Some(Ok(Command::Topic { name: "Linear Algebra".into() }))
        );
        assert_eq!(Command::parse("/newtopic"), Some(Ok(Command::NewTopic { name: None })));
        assert_eq!(
            Command::parse("/newtopic Physics"),
            Some(Ok(Command::NewTopic { name: Some("Physics".into()) }))
        );
    }

    #[test]
    fn commit_is_an_alias_for_done() {
        assert_eq!(Command::parse("/commit"), Some(Ok(Command::Done)));
        assert_eq!(Command::parse("/DONE"), Some(Ok(Command::Done)));
    }

    #[test]
    fn bot_suffix_is_ignored() {
        assert_eq!(Command::parse("/cancel@TopicRelayBot"), Some(Ok(Command::Cancel)));
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert_eq!(
            Command::parse("/upload general"),
            Some(Err(CommandError::InvalidArgs { usage: "/upload [destination id]" }))
        );
        assert_eq!(
            Command::parse("/topic"),
            Some(Err(CommandError::InvalidArgs { usage: "/topic <name>" }))
        );
        assert_eq!(Command::parse("/frobnicate"), Some(Err(CommandError::Unknown("frobnicate".into()))));
    }
}
