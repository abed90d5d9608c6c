use std::sync::Arc;

use crate::ids::MessageId;
use crate::message::ChatMessage;

/// Messages per sealed segment. Appends copy at most this many messages.
const SEGMENT_LEN: usize = 64;

/// Full, immutable run of messages linked to the run before it.
#[derive(Debug)]
struct Segment {
    start: usize,
    messages: Box<[ChatMessage]>,
    previous: Option<Arc<Segment>>,
}

/// Ordered, append-only record of committed messages.
///
/// History is kept as a chain of sealed segments plus a short open tail. Snapshots share
/// the sealed segments, so holding one across appends costs at most a tail copy.
#[derive(Debug)]
pub struct ChatLog {
    sealed: Option<Arc<Segment>>,
    sealed_len: usize,
    tail: Arc<Vec<ChatMessage>>,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self {
            sealed: None,
            sealed_len: 0,
            tail: Arc::new(Vec::with_capacity(SEGMENT_LEN)),
        }
    }
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) {
        let tail = Arc::make_mut(&mut self.tail);
        tail.push(message);
        if tail.len() < SEGMENT_LEN {
            return;
        }

        let full = std::mem::replace(tail, Vec::with_capacity(SEGMENT_LEN));
        let segment = Segment {
            start: self.sealed_len,
            messages: full.into_boxed_slice(),
            previous: self.sealed.take(),
        };
        self.sealed_len += segment.messages.len();
        self.sealed = Some(Arc::new(segment));
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            sealed: self.sealed.clone(),
            sealed_len: self.sealed_len,
            tail: Arc::clone(&self.tail),
        }
    }

    pub fn len(&self) -> usize {
        self.sealed_len + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Immutable point-in-time view of a [`ChatLog`].
#[derive(Debug, Clone)]
pub struct ChatSnapshot {
    sealed: Option<Arc<Segment>>,
    sealed_len: usize,
    tail: Arc<Vec<ChatMessage>>,
}

impl ChatSnapshot {
    pub fn len(&self) -> usize {
        self.sealed_len + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&ChatMessage> {
        if index >= self.sealed_len {
            return self.tail.get(index - self.sealed_len);
        }

        let mut segment = self.sealed.as_deref();
        while let Some(current) = segment {
            if index >= current.start {
                return current.messages.get(index - current.start);
            }
            segment = current.previous.as_deref();
        }
        None
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.tail
            .last()
            .or_else(|| self.sealed.as_ref().and_then(|segment| segment.messages.last()))
    }

    /// Looks up a message by id, newest first.
    pub fn find(&self, id: MessageId) -> Option<&ChatMessage> {
        self.segments()
            .into_iter()
            .rev()
            .flat_map(|segment| segment.iter().rev())
            .find(|message| message.id() == id)
    }

    pub fn iter(&self) -> Iter<'_> {
        let mut segments = self.segments().into_iter();
        let current = segments.next().unwrap_or_default().iter();
        Iter { segments, current }
    }

    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.iter().cloned().collect()
    }

    /// Message runs, oldest first.
    fn segments(&self) -> Vec<&[ChatMessage]> {
        let mut segments = Vec::new();
        let mut segment = self.sealed.as_deref();
        while let Some(current) = segment {
            segments.push(&current.messages[..]);
            segment = current.previous.as_deref();
        }
        segments.reverse();
        segments.push(&self.tail[..]);
        segments
    }
}

impl PartialEq for ChatSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for ChatSnapshot {}

/// Iterator over a [`ChatSnapshot`] in display order.
pub struct Iter<'a> {
    segments: std::vec::IntoIter<&'a [ChatMessage]>,
    current: std::slice::Iter<'a, ChatMessage>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a ChatMessage;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(message) = self.current.next() {
                return Some(message);
            }
            self.current = self.segments.next()?.iter();
        }
    }
}

impl<'a> IntoIterator for &'a ChatSnapshot {
    type Item = &'a ChatMessage;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Locator;

    fn filled(count: usize) -> ChatLog {
        let mut log = ChatLog::new();
        for index in 0..count {
            log.append(ChatMessage::from_text(format!("message-{index}")));
        }
        log
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut log = ChatLog::new();
        log.append(ChatMessage::from_text("a"));
        log.append(ChatMessage::from_image(Locator::from("img://2")));
        log.append(ChatMessage::from_text("b"));

        let snapshot = log.snapshot();
        let rendered = snapshot
            .iter()
            .map(|message| {
                message
                    .text()
                    .map(str::to_string)
                    .or_else(|| message.image_ref().map(|reference| reference.to_string()))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>();
        assert_eq!(rendered, ["a", "img://2", "b"]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn later_appends_do_not_change_earlier_snapshot() {
        let mut log = ChatLog::new();
        log.append(ChatMessage::from_text("first"));
        let before = log.snapshot();

        log.append(ChatMessage::from_text("second"));

        assert_eq!(before.len(), 1);
        assert_eq!(before.get(0).and_then(ChatMessage::text), Some("first"));
        assert_eq!(log.snapshot().len(), 2);
    }

    #[test]
    fn held_snapshot_shares_sealed_history_across_appends() {
        let mut log = filled(1_000);
        let held = log.snapshot();
        let held_segments = held.segments();

        for index in 0..100 {
            log.append(ChatMessage::from_text(format!("late-{index}")));
            let latest = log.snapshot();
            let latest_segments = latest.segments();

            // Every sealed run the held snapshot sees is the same allocation, not a copy.
            for (held_run, latest_run) in held_segments[..held_segments.len() - 1]
                .iter()
                .zip(&latest_segments)
            {
                assert_eq!(held_run.as_ptr(), latest_run.as_ptr());
            }
        }

        assert_eq!(held.len(), 1_000);
        assert_eq!(held.to_vec().len(), 1_000);
        assert_eq!(held.last().and_then(ChatMessage::text), Some("message-999"));
        assert_eq!(log.len(), 1_100);
    }

    #[test]
    fn iteration_and_lookup_cross_segment_boundaries() {
        let log = filled(SEGMENT_LEN * 3 + 5);
        let snapshot = log.snapshot();

        let texts = snapshot
            .iter()
            .filter_map(ChatMessage::text)
            .map(str::to_string)
            .collect::<Vec<_>>();
        let expected = (0..SEGMENT_LEN * 3 + 5)
            .map(|index| format!("message-{index}"))
            .collect::<Vec<_>>();
        assert_eq!(texts, expected);

        for index in [0, SEGMENT_LEN - 1, SEGMENT_LEN, SEGMENT_LEN * 3, SEGMENT_LEN * 3 + 4] {
            let expected = format!("message-{index}");
            assert_eq!(
                snapshot.get(index).and_then(ChatMessage::text),
                Some(expected.as_str())
            );
        }
        assert!(snapshot.get(SEGMENT_LEN * 3 + 5).is_none());

        let target = snapshot.get(SEGMENT_LEN + 1).map(ChatMessage::id);
        assert_eq!(
            target.and_then(|id| snapshot.find(id)).map(ChatMessage::id),
            target
        );
    }

    #[test]
    fn exact_segment_fill_leaves_empty_tail() {
        let snapshot = filled(SEGMENT_LEN).snapshot();
        assert_eq!(snapshot.len(), SEGMENT_LEN);
        assert_eq!(snapshot.iter().count(), SEGMENT_LEN);
        let expected = format!("message-{}", SEGMENT_LEN - 1);
        assert_eq!(
            snapshot.last().and_then(ChatMessage::text),
            Some(expected.as_str())
        );
    }

    #[test]
    fn identical_messages_are_not_deduplicated() {
        let mut log = ChatLog::new();
        log.append(ChatMessage::from_text("same"));
        log.append(ChatMessage::from_text("same"));
        assert_eq!(log.len(), 2);
        assert!(!log.is_empty());
    }
}
