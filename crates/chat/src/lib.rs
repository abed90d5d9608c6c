#![deny(unsafe_code)]

//! Chat message state and the media-attachment intake pipeline.
//!
//! A [`ChatSession`] owns the draft, the outstanding media request and the ordered log of
//! committed messages. Renderers read [`ChatSnapshot`]s; picker collaborators implement
//! [`MediaPicker`] and report back through [`ChatSession::on_picker_result`].
pub mod composer;
pub mod error;
pub mod events;
pub mod ids;
pub mod log;
pub mod media;
pub mod message;
pub mod session;

pub use composer::MessageComposer;
pub use error::{ChatError, ChatResult};
pub use events::SessionEvent;
pub use ids::MessageId;
pub use log::{ChatLog, ChatSnapshot};
pub use media::{MediaKind, MediaSelection, PendingSelection, PickerOutcome};
pub use message::{ChatMessage, Locator, MessageContent};
pub use session::{
    AttachRejection, AttachState, AttachTransition, AttachTransitionResult, ChatSession,
    EVENT_BACKLOG_LIMIT, MediaPicker,
};

/// Returns the packaged module name checked against the bundled test resources.
pub fn module_name() -> &'static str {
    env!("CARGO_PKG_NAME")
}
