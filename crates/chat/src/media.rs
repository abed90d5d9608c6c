use std::fmt;

use crate::message::Locator;

/// Acquisition source of a media request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Camera,
    Library,
}

impl MediaKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Library => "library",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Resolved reference awaiting conversion into a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSelection {
    pub kind: MediaKind,
    pub reference: Locator,
}

/// What the picker collaborator reported when it finished.
///
/// Keeps "user declined" distinct from "nothing happened yet", which is simply the
/// absence of an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Resolved(Locator),
    Cancelled,
}

impl From<Option<Locator>> for PickerOutcome {
    fn from(value: Option<Locator>) -> Self {
        match value {
            Some(reference) => Self::Resolved(reference),
            None => Self::Cancelled,
        }
    }
}

/// One outstanding "ask the platform for a photo" request and its resolution.
#[derive(Debug, Default)]
pub struct MediaSelection {
    in_flight: Option<MediaKind>,
    pending: Option<PendingSelection>,
}

impl MediaSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a request of `kind` as in flight. Calling again before resolution restarts the
    /// flow; requests never stack.
    pub fn begin(&mut self, kind: MediaKind) {
        if let Some(previous) = self.in_flight.replace(kind) {
            tracing::debug!(%previous, %kind, "restarting in-flight media selection");
        }
    }

    pub fn in_flight(&self) -> Option<MediaKind> {
        self.in_flight
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Settles the in-flight request and returns its kind.
    ///
    /// A resolved reference overwrites any unconsumed one. A cancellation clears the pending
    /// value without notifying anything downstream. Returns `None` when no request was in
    /// flight, in which case the outcome is dropped.
    pub fn resolve(&mut self, outcome: impl Into<PickerOutcome>) -> Option<MediaKind> {
        let outcome = outcome.into();
        let Some(kind) = self.in_flight.take() else {
            tracing::debug!(?outcome, "dropping picker outcome with no request in flight");
            return None;
        };

        match outcome {
            PickerOutcome::Resolved(reference) => {
                let selection = PendingSelection { kind, reference };
                if let Some(overwritten) = self.pending.replace(selection) {
                    tracing::debug!(
                        reference = %overwritten.reference,
                        "overwrote unconsumed pending selection"
                    );
                }
            }
            PickerOutcome::Cancelled => {
                self.pending = None;
            }
        }

        Some(kind)
    }

    /// Reads and clears the pending selection, handing ownership to the caller.
    pub fn take(&mut self) -> Option<PendingSelection> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_then_take_hands_over_reference_once() {
        let mut selection = MediaSelection::new();
        selection.begin(MediaKind::Library);

        assert_eq!(
            selection.resolve(Some(Locator::from("img://42"))),
            Some(MediaKind::Library)
        );
        assert_eq!(selection.in_flight(), None);

        let pending = selection.take().expect("resolved reference is pending");
        assert_eq!(pending.kind, MediaKind::Library);
        assert_eq!(pending.reference.as_str(), "img://42");
        assert_eq!(selection.take(), None);
    }

    #[test]
    fn later_resolution_overwrites_unconsumed_one() {
        let mut selection = MediaSelection::new();
        selection.begin(MediaKind::Camera);
        selection.resolve(PickerOutcome::Resolved(Locator::from("img://1")));
        selection.begin(MediaKind::Library);
        selection.resolve(PickerOutcome::Resolved(Locator::from("img://2")));

        let pending = selection.take().expect("latest reference is pending");
        assert_eq!(pending.kind, MediaKind::Library);
        assert_eq!(pending.reference.as_str(), "img://2");
        assert!(!selection.has_pending());
    }

    #[test]
    fn cancellation_clears_pending_state() {
        let mut selection = MediaSelection::new();
        selection.begin(MediaKind::Camera);
        selection.resolve(Some(Locator::from("img://1")));
        selection.begin(MediaKind::Camera);

        assert_eq!(selection.resolve(None::<Locator>), Some(MediaKind::Camera));
        assert_eq!(selection.take(), None);
        assert_eq!(selection.in_flight(), None);
    }

    #[test]
    fn outcome_without_request_in_flight_is_dropped() {
        let mut selection = MediaSelection::new();
        assert_eq!(selection.resolve(Some(Locator::from("img://9"))), None);
        assert_eq!(selection.take(), None);
    }

    #[test]
    fn begin_again_restarts_without_stacking() {
        let mut selection = MediaSelection::new();
        selection.begin(MediaKind::Camera);
        selection.begin(MediaKind::Camera);
        selection.resolve(PickerOutcome::Cancelled);
        assert_eq!(selection.in_flight(), None);
    }
}
