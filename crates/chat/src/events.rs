use crate::ids::MessageId;
use crate::media::MediaKind;

/// Notification recorded by [`crate::ChatSession`] after each mutation.
///
/// Rendering collaborators pull these with `drain_events` and re-read `messages()`; the core
/// never pushes into the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The picker collaborator was asked to present its UI.
    PickerRequested(MediaKind),
    /// A committed message was appended to the log.
    MessageAppended(MessageId),
    /// The user declined the picker. The log is untouched.
    SelectionCancelled(MediaKind),
    /// A second attach flow was refused while one is outstanding.
    AttachRejected {
        active: MediaKind,
        attempted: MediaKind,
    },
    /// A picker callback arrived while no selection was outstanding.
    StaleCallbackIgnored,
}

impl SessionEvent {
    /// Returns true when renderers should re-read the message list.
    pub fn changes_messages(&self) -> bool {
        matches!(self, Self::MessageAppended(_))
    }
}
