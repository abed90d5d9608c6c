use std::fmt;
use std::str::FromStr;

use snafu::ResultExt;
use uuid::Uuid;

use super::error::{ChatError, ChatResult, MalformedMessageIdSnafu};

/// Identity of one committed message. Minted once per message and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new_v7() -> Self {
        Self(Uuid::now_v7())
    }

    /// Reads an id back from its displayed form, e.g. one a user typed.
    pub fn parse(raw: &str) -> ChatResult<Self> {
        let raw = raw.trim();
        Uuid::parse_str(raw)
            .map(Self)
            .context(MalformedMessageIdSnafu {
                stage: "parse-message-id",
                raw,
            })
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = ChatError;

    fn from_str(raw: &str) -> ChatResult<Self> {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn minted_ids_are_unique() {
        let ids = (0..1_000).map(|_| MessageId::new_v7()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn displayed_id_reads_back() {
        let id = MessageId::new_v7();
        let parsed: MessageId = format!(" {id}\n").parse().expect("display output is a uuid");
        assert_eq!(parsed, id);
        assert_eq!(parsed.as_uuid(), id.as_uuid());
    }

    #[test]
    fn locator_is_not_a_message_id() {
        let ChatError::MalformedMessageId { stage, raw, .. } =
            MessageId::parse("img://42").expect_err("not a uuid");
        assert_eq!(stage, "parse-message-id");
        assert_eq!(raw, "img://42");
    }
}
