use std::collections::VecDeque;

use crate::composer::MessageComposer;
use crate::events::SessionEvent;
use crate::ids::MessageId;
use crate::log::{ChatLog, ChatSnapshot};
use crate::media::{MediaKind, MediaSelection, PickerOutcome};
use crate::message::ChatMessage;

/// Seam to the platform media picker.
///
/// `present` only signals the picker to show its UI; the result comes back later through
/// [`ChatSession::on_picker_result`].
pub trait MediaPicker {
    fn present(&mut self, kind: MediaKind);
}

impl<F> MediaPicker for F
where
    F: FnMut(MediaKind),
{
    fn present(&mut self, kind: MediaKind) {
        self(kind)
    }
}

/// Attachment flow state. `Resolved` is transient inside `on_picker_result` and never observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttachState {
    #[default]
    Idle,
    Selecting(MediaKind),
}

/// State transition input for the attachment flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachTransition {
    Begin(MediaKind),
    Resolve,
    Cancel,
}

/// Rejection reason for illegal attachment transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachRejection {
    AlreadySelecting {
        active: MediaKind,
        attempted: MediaKind,
    },
    NotSelecting,
}

pub type AttachTransitionResult = Result<AttachState, AttachRejection>;

impl AttachState {
    /// Returns the outstanding picker kind if and only if state is `Selecting`.
    pub fn selecting_kind(&self) -> Option<MediaKind> {
        match self {
            Self::Selecting(kind) => Some(*kind),
            Self::Idle => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Applies one transition deterministically.
    ///
    /// Only one picker flow may be outstanding. Beginning the same kind again restarts the
    /// flow; beginning a different kind is rejected.
    pub fn apply(&self, transition: AttachTransition) -> AttachTransitionResult {
        match (self, transition) {
            (Self::Idle, AttachTransition::Begin(kind)) => Ok(Self::Selecting(kind)),
            (Self::Selecting(active), AttachTransition::Begin(attempted))
                if *active == attempted =>
            {
                Ok(*self)
            }
            (Self::Selecting(active), AttachTransition::Begin(attempted)) => {
                Err(AttachRejection::AlreadySelecting {
                    active: *active,
                    attempted,
                })
            }
            (Self::Selecting(_), AttachTransition::Resolve | AttachTransition::Cancel) => {
                Ok(Self::Idle)
            }
            (Self::Idle, AttachTransition::Resolve | AttachTransition::Cancel) => {
                Err(AttachRejection::NotSelecting)
            }
        }
    }
}

/// Events retained between drains. Older events are dropped first once the backlog is full.
pub const EVENT_BACKLOG_LIMIT: usize = 256;

/// Entry point for the surrounding UI: sequences media selection, composition and the log.
///
/// All operations complete synchronously on the caller's thread. None of them fail; refused
/// interactions degrade to logged no-ops.
pub struct ChatSession<P> {
    picker: P,
    attach_state: AttachState,
    selection: MediaSelection,
    composer: MessageComposer,
    log: ChatLog,
    events: VecDeque<SessionEvent>,
}

impl<P> ChatSession<P>
where
    P: MediaPicker,
{
    pub fn new(picker: P) -> Self {
        Self {
            picker,
            attach_state: AttachState::Idle,
            selection: MediaSelection::new(),
            composer: MessageComposer::new(),
            log: ChatLog::new(),
            events: VecDeque::with_capacity(EVENT_BACKLOG_LIMIT),
        }
    }

    pub fn attach_state(&self) -> AttachState {
        self.attach_state
    }

    pub fn draft(&self) -> &str {
        self.composer.draft()
    }

    pub fn picker(&self) -> &P {
        &self.picker
    }

    pub fn messages(&self) -> ChatSnapshot {
        self.log.snapshot()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Takes the retained events, oldest first. At most [`EVENT_BACKLOG_LIMIT`] are kept
    /// between drains, so sessions that only poll `messages()` stay bounded.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    /// Enters `Selecting(kind)` and signals the picker. Returns immediately.
    pub fn begin_attach(&mut self, kind: MediaKind) -> AttachTransitionResult {
        let next_state = match self.attach_state.apply(AttachTransition::Begin(kind)) {
            Ok(next_state) => next_state,
            Err(rejection) => {
                tracing::warn!(?rejection, "rejected attach request while a picker is open");
                if let AttachRejection::AlreadySelecting { active, attempted } = rejection {
                    self.record(SessionEvent::AttachRejected { active, attempted });
                }
                return Err(rejection);
            }
        };

        self.attach_state = next_state;
        self.selection.begin(kind);
        self.picker.present(kind);
        self.record(SessionEvent::PickerRequested(kind));
        tracing::info!(%kind, "presenting media picker");
        Ok(next_state)
    }

    /// Drives the resolve/cancel transitions. Callbacks that arrive while idle are ignored.
    pub fn on_picker_result(&mut self, outcome: impl Into<PickerOutcome>) -> Option<MessageId> {
        let outcome = outcome.into();
        let transition = match outcome {
            PickerOutcome::Resolved(_) => AttachTransition::Resolve,
            PickerOutcome::Cancelled => AttachTransition::Cancel,
        };

        match self.attach_state.apply(transition) {
            Ok(next_state) => self.attach_state = next_state,
            Err(rejection) => {
                tracing::debug!(?rejection, ?outcome, "ignoring stale picker callback");
                self.record(SessionEvent::StaleCallbackIgnored);
                return None;
            }
        }

        let cancelled = matches!(outcome, PickerOutcome::Cancelled);
        let kind = self.selection.resolve(outcome)?;
        if cancelled {
            tracing::info!(%kind, "media selection cancelled");
            self.record(SessionEvent::SelectionCancelled(kind));
            return None;
        }

        let pending = self.selection.take()?;
        let message = self.composer.consume_media(pending);
        Some(self.commit(message))
    }

    /// Replaces the draft and commits it when non-empty.
    pub fn send_text(&mut self, draft: impl Into<String>) -> Option<MessageId> {
        self.composer.set_text(draft);
        let Some(message) = self.composer.submit_text() else {
            tracing::debug!("ignoring empty text submission");
            return None;
        };

        Some(self.commit(message))
    }

    fn commit(&mut self, message: ChatMessage) -> MessageId {
        let id = message.id();
        tracing::debug!(%id, image = message.is_image(), "appending chat message");
        self.log.append(message);
        self.record(SessionEvent::MessageAppended(id));
        id
    }

    fn record(&mut self, event: SessionEvent) {
        if self.events.len() == EVENT_BACKLOG_LIMIT {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}
