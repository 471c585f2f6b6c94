//! Content model and classification.
//!
//! The transport adapter describes each inbound message as an
//! [`InboundContent`] and classifies it exactly once into a [`QueuedItem`].
//! Classification is first-match by precedence: video, document, photo, text.
//! A message carrying none of these is rejected, never silently dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PayloadRef, SessionError};

/// Closed set of content kinds the relay can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Plain or formatted text message.
    Text,
    /// Photo with optional caption.
    Photo,
    /// Video with optional caption.
    Video,
    /// Document (any file) with optional caption.
    Document,
}

impl ContentKind {
    /// All kinds, in report order.
    pub const ALL: [Self; 4] = [Self::Text, Self::Photo, Self::Video, Self::Document];

    /// Lower-case name used in logs and replies.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formatting span attached to a text body or caption.
///
/// Passed through to delivery untouched. `style` is the transport's own
/// entity name (`bold`, `text_link`, ...), `offset` and `length` are in the
/// transport's units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormattingEntity {
    /// Start of the span.
    pub offset: u32,
    /// Length of the span.
    pub length: u32,
    /// Transport-defined style name.
    pub style: String,
}

impl FormattingEntity {
    /// Create a formatting span.
    pub fn new(offset: u32, length: u32, style: impl Into<String>) -> Self {
        Self { offset, length, style: style.into() }
    }
}

/// A classified content item waiting in the session queue.
///
/// Immutable once built. For [`ContentKind::Text`] the payload is the message
/// body and `entities` format the body; for media the payload is the file
/// handle and `entities` format the caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedItem {
    kind: ContentKind,
    payload: PayloadRef,
    caption: Option<String>,
    entities: Vec<FormattingEntity>,
}

impl QueuedItem {
    /// Text item. The body travels as the payload.
    pub fn text(body: impl Into<String>, entities: Vec<FormattingEntity>) -> Self {
        Self { kind: ContentKind::Text, payload: PayloadRef::new(body), caption: None, entities }
    }

    /// Photo item.
    pub fn photo(
        payload: PayloadRef,
        caption: Option<String>,
        entities: Vec<FormattingEntity>,
    ) -> Self {
        Self { kind: ContentKind::Photo, payload, caption, entities }
    }

    /// Video item.
    pub fn video(
        payload: PayloadRef,
        caption: Option<String>,
        entities: Vec<FormattingEntity>,
    ) -> Self {
        Self { kind: ContentKind::Video, payload, caption, entities }
    }

    /// Document item.
    pub fn document(
        payload: PayloadRef,
        caption: Option<String>,
        entities: Vec<FormattingEntity>,
    ) -> Self {
        Self { kind: ContentKind::Document, payload, caption, entities }
    }

    /// Kind selected at classification.
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Content handle (text body for text items).
    pub fn payload(&self) -> &PayloadRef {
        &self.payload
    }

    /// Caption, if any. Always `None` for text.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Formatting spans, in transport order.
    pub fn entities(&self) -> &[FormattingEntity] {
        &self.entities
    }
}

/// Raw description of an inbound message, as built by the transport adapter.
///
/// Several fields may be set at once; [`InboundContent::classify`] picks
/// exactly one kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundContent {
    /// Message body, for text messages.
    pub text: Option<String>,
    /// Photo handle (largest size chosen by the adapter).
    pub photo: Option<PayloadRef>,
    /// Video handle.
    pub video: Option<PayloadRef>,
    /// Document handle.
    pub document: Option<PayloadRef>,
    /// Caption accompanying media.
    pub caption: Option<String>,
    /// Formatting spans for the body or caption.
    pub entities: Vec<FormattingEntity>,
    /// Transport name of an attachment the relay does not handle (sticker,
    /// voice, poll, ...), used in the rejection message.
    pub unsupported: Option<String>,
}

impl InboundContent {
    /// Text message.
    pub fn text(body: impl Into<String>) -> Self {
        Self { text: Some(body.into()), ..Self::default() }
    }

    /// Photo message.
    pub fn photo(payload: impl Into<PayloadRef>) -> Self {
        Self { photo: Some(payload.into()), ..Self::default() }
    }

    /// Video message.
    pub fn video(payload: impl Into<PayloadRef>) -> Self {
        Self { video: Some(payload.into()), ..Self::default() }
    }

    /// Document message.
    pub fn document(payload: impl Into<PayloadRef>) -> Self {
        Self { document: Some(payload.into()), ..Self::default() }
    }

    /// Message with an attachment the relay cannot deliver.
    pub fn unsupported(description: impl Into<String>) -> Self {
        Self { unsupported: Some(description.into()), ..Self::default() }
    }

    /// Attach a caption.
    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Attach formatting spans.
    #[must_use]
    pub fn with_entities(mut self, entities: Vec<FormattingEntity>) -> Self {
        self.entities = entities;
        self
    }

    /// Body of a message that carries text and nothing else.
    pub fn plain_text(&self) -> Option<&str> {
        let bare = self.photo.is_none()
            && self.video.is_none()
            && self.document.is_none()
            && self.unsupported.is_none();
        self.text.as_deref().filter(|body| bare && !body.trim().is_empty())
    }

    /// Classify into exactly one [`ContentKind`].
    ///
    /// Precedence is video, document, photo, then text that is not blank. Captions
    /// and entities are carried over verbatim.
    pub fn classify(self) -> Result<QueuedItem, SessionError> {
        let Self { text, photo, video, document, caption, entities, unsupported } = self;

        if let Some(payload) = video {
            return Ok(QueuedItem::video(payload, caption, entities));
        }
        if let Some(payload) = document {
            return Ok(QueuedItem::document(payload, caption, entities));
        }
        if let Some(payload) = photo {
            return Ok(QueuedItem::photo(payload, caption, entities));
        }
        match text {
            Some(body) if !body.trim().is_empty() => Ok(QueuedItem::text(body, entities)),
            _ => Err(SessionError::UnsupportedContent {
                description: unsupported.unwrap_or_else(|| "empty message".to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_excludes_media() {
        assert_eq!(InboundContent::text("algebra").plain_text(), Some("algebra"));
        assert_eq!(InboundContent::text("  ").plain_text(), None);
        assert_eq!(InboundContent::photo("pic").with_caption("algebra").plain_text(), None);

        let captioned = InboundContent { text: Some("algebra".into()), ..InboundContent::photo("pic") };
        assert_eq!(captioned.plain_text(), None);
    }

    #[test]
    fn video_wins_over_document_and_photo() {
        let inbound = InboundContent {
            video: Some("vid".into()),
            document: Some("doc".into()),
            photo: Some("pic".into()),
            ..InboundContent::default()
        };

        let item = inbound.classify();
        assert_eq!(item.map(|i| i.kind()), Ok(ContentKind::Video));
    }

    #[test]
    fn document_wins_over_photo() {
        let inbound = InboundContent {
            document: Some("doc".into()),
            photo: Some("pic".into()),
            ..InboundContent::default()
        };

        assert_eq!(inbound.classify().map(|i| i.kind()), Ok(ContentKind::Document));
    }

    #[test]
    fn media_keeps_caption_and_entities() {
        let entities = vec![FormattingEntity::new(0, 4, "bold")];
        let item = InboundContent::photo("pic")
            .with_caption("*Note* <b>raw</b> & more")
            .with_entities(entities.clone())
            .classify();

        let Ok(item) = item else { panic!("photo should classify") };
        assert_eq!(item.caption(), Some("*Note* <b>raw</b> & more"));
        assert_eq!(item.entities(), entities.as_slice());
        assert_eq!(item.payload().as_str(), "pic");
    }

    #[test]
    fn text_body_becomes_payload() {
        let item = InboundContent::text("hello").classify();

        let Ok(item) = item else { panic!("text should classify") };
        assert_eq!(item.kind(), ContentKind::Text);
        assert_eq!(item.payload().as_str(), "hello");
        assert_eq!(item.caption(), None);
    }

    #[test]
    fn unsupported_attachment_is_rejected_with_description() {
        let result = InboundContent::unsupported("sticker").classify();
        assert_eq!(
            result,
            Err(SessionError::UnsupportedContent { description: "sticker".to_string() })
        );
    }

    #[test]
    fn empty_message_is_rejected() {
        let result = InboundContent::text("").classify();
        assert!(matches!(result, Err(SessionError::UnsupportedContent { .. })));
    }

    #[test]
    fn blank_text_is_rejected_like_empty() {
        let inbound = InboundContent::text(" \n\t ");

        assert_eq!(inbound.plain_text(), None);
        assert_eq!(
            inbound.classify(),
            Err(SessionError::UnsupportedContent { description: "empty message".into() })
        );
    }
}
