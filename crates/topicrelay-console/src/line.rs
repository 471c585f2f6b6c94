//! Console line syntax.
//!
//! `[@actor] input`, where input is one of:
//!
//! - `photo <id> [caption]`, `video <id> [caption]`, `document <id> [caption]`
//! - `sticker <id>`, standing in for any attachment the relay cannot deliver
//! - anything else, sent as a text message (commands included)

use topicrelay_core::{ActorId, InboundContent};

use crate::ConsoleError;

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    /// Sender of the message.
    pub actor: ActorId,
    /// Message as the transport would describe it.
    pub content: InboundContent,
}

/// Parse one line. Blank lines yield `None`.
pub fn parse_line(line: &str, operator: ActorId) -> Result<Option<ConsoleLine>, ConsoleError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (actor, input) = match line.strip_prefix('@') {
        Some(rest) => {
            let (id, input) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let id = id.parse::<i64>().map_err(|_| ConsoleError::InvalidActor(id.to_string()))?;
            (ActorId(id), input.trim())
        },
        None => (operator, line),
    };
    if input.is_empty() {
        return Ok(None);
    }

    Ok(Some(ConsoleLine { actor, content: content(input)? }))
}

fn content(input: &str) -> Result<InboundContent, ConsoleError> {
    let (word, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));

    let kind = match word {
        "photo" => "photo",
        "video" => "video",
        "document" => "document",
        "sticker" => return Ok(InboundContent::unsupported("sticker")),
        _ => return Ok(InboundContent::text(input)),
    };

    let rest = rest.trim();
    let (payload, caption) = match rest.split_once(char::is_whitespace) {
        Some((payload, caption)) => (payload, Some(caption.trim())),
        None => (rest, None),
    };
    if payload.is_empty() {
        return Err(ConsoleError::MissingPayload { kind });
    }

    let content = match kind {
        "photo" => InboundContent::photo(payload),
        "video" => InboundContent::video(payload),
        _ => InboundContent::document(payload),
    };
    Ok(match caption {
        Some(caption) => content.with_caption(caption),
        None => content,
    })
}
