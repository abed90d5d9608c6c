use crate::media::PendingSelection;
use crate::message::ChatMessage;

/// Draft buffer plus the hand-off from finished input to committed messages.
///
/// Text and media are independent tracks: consuming media never touches the draft.
#[derive(Debug, Default)]
pub struct MessageComposer {
    draft: String,
}

impl MessageComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replaces the draft verbatim. No trimming happens here.
    pub fn set_text(&mut self, value: impl Into<String>) {
        self.draft = value.into();
    }

    /// Commits a non-empty draft as a text message and clears the buffer.
    ///
    /// An empty draft is a no-op, mirroring a disabled send button.
    pub fn submit_text(&mut self) -> Option<ChatMessage> {
        if self.draft.is_empty() {
            return None;
        }

        let text = std::mem::take(&mut self.draft);
        Some(ChatMessage::from_text(text))
    }

    pub fn consume_media(&self, selection: PendingSelection) -> ChatMessage {
        ChatMessage::from_image(selection.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;
    use crate::message::Locator;

    #[test]
    fn submit_commits_draft_and_clears_it() {
        let mut composer = MessageComposer::new();
        composer.set_text("hello");

        let message = composer.submit_text().expect("non-empty draft commits");
        assert_eq!(message.text(), Some("hello"));
        assert_eq!(message.image_ref(), None);
        assert_eq!(composer.draft(), "");
    }

    #[test]
    fn empty_draft_submits_nothing() {
        let mut composer = MessageComposer::new();
        composer.set_text("");
        assert_eq!(composer.submit_text(), None);
        assert_eq!(composer.draft(), "");
    }

    #[test]
    fn draft_is_kept_verbatim() {
        let mut composer = MessageComposer::new();
        composer.set_text("  spaced  ");
        let message = composer.submit_text().expect("whitespace is content");
        assert_eq!(message.text(), Some("  spaced  "));
    }

    #[test]
    fn consuming_media_leaves_draft_alone() {
        let mut composer = MessageComposer::new();
        composer.set_text("caption in progress");

        let message = composer.consume_media(PendingSelection {
            kind: MediaKind::Camera,
            reference: Locator::from("img://7"),
        });

        assert_eq!(message.image_ref().map(Locator::as_str), Some("img://7"));
        assert_eq!(message.text(), None);
        assert_eq!(composer.draft(), "caption in progress");
    }
}
