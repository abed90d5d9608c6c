use std::fmt;

use crate::ids::MessageId;

/// Opaque reference to externally stored image data. The core never dereferences it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(String);

impl Locator {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for Locator {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Locator {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Payload of one committed message: a message is either text or an image, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    Image(Locator),
}

/// Immutable committed chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    id: MessageId,
    content: MessageContent,
}

impl ChatMessage {
    pub(crate) fn from_text(text: impl Into<String>) -> Self {
        Self::with_content(MessageContent::Text(text.into()))
    }

    pub(crate) fn from_image(reference: Locator) -> Self {
        Self::with_content(MessageContent::Image(reference))
    }

    fn with_content(content: MessageContent) -> Self {
        Self {
            id: MessageId::new_v7(),
            content,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(text) => Some(text),
            MessageContent::Image(_) => None,
        }
    }

    pub fn image_ref(&self) -> Option<&Locator> {
        match &self.content {
            MessageContent::Image(reference) => Some(reference),
            MessageContent::Text(_) => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self.content, MessageContent::Image(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_message_carries_no_image() {
        let message = ChatMessage::from_text("hello");
        assert_eq!(message.text(), Some("hello"));
        assert_eq!(message.image_ref(), None);
        assert!(!message.is_image());
    }

    #[test]
    fn image_message_carries_no_text() {
        let message = ChatMessage::from_image(Locator::from("img://42"));
        assert_eq!(message.text(), None);
        assert_eq!(message.image_ref().map(Locator::as_str), Some("img://42"));
        assert!(message.is_image());
    }

    #[test]
    fn each_message_gets_its_own_id() {
        let first = ChatMessage::from_text("same");
        let second = ChatMessage::from_text("same");
        assert_ne!(first.id(), second.id());
        assert_ne!(first, second);
    }
}
