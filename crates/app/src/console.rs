use photochat_chat::{ChatMessage, Locator, MediaKind, MessageContent, MessageId};
use photochat_settings::{Appearance, Tab};

pub const HELP_TEXT: &str = "\
commands:
  /camera                 take a photo for the chat
  /library                select a picture from the media library
  /pick <locator>         finish the open picker with an image reference
  /cancel                 dismiss the open picker
  /messages               list the chat with message ids
  /show <message-id>      show one message
  /name <value>           change the display name
  /appearance <mode>      system, light or dark
  /tab <tab>              timeline, chat or settings
  /quit                   leave
anything else is sent as a text message";

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Attach(MediaKind),
    Pick(Locator),
    Cancel,
    Messages,
    Show(MessageId),
    Name(String),
    Appearance(Appearance),
    Tab(Tab),
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Send(line.to_string());
        };

        let (name, argument) = match rest.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (rest, ""),
        };

        match (name, argument) {
            ("camera", "") => Self::Attach(MediaKind::Camera),
            ("library", "") => Self::Attach(MediaKind::Library),
            ("pick", "") => Self::Invalid("usage: /pick <locator>".to_string()),
            ("pick", locator) => Self::Pick(Locator::new(locator)),
            ("cancel", "") => Self::Cancel,
            ("messages", "") => Self::Messages,
            ("show", "") => Self::Invalid("usage: /show <message-id>".to_string()),
            ("show", raw) => match MessageId::parse(raw) {
                Ok(id) => Self::Show(id),
                Err(error) => Self::Invalid(format!("Error: {error}")),
            },
            ("name", "") => Self::Invalid("usage: /name <value>".to_string()),
            ("name", value) => Self::Name(value.to_string()),
            ("appearance", mode) => match mode.to_ascii_lowercase().as_str() {
                "system" => Self::Appearance(Appearance::System),
                "light" => Self::Appearance(Appearance::Light),
                "dark" => Self::Appearance(Appearance::Dark),
                _ => Self::Invalid("usage: /appearance <system|light|dark>".to_string()),
            },
            ("tab", tab) => match Tab::parse(tab) {
                Some(tab) => Self::Tab(tab),
                None => Self::Invalid("usage: /tab <timeline|chat|settings>".to_string()),
            },
            ("help", _) => Self::Help,
            ("quit", _) => Self::Quit,
            _ => Self::Invalid(format!("unknown command '/{rest}', try /help")),
        }
    }
}

pub fn render_message(message: &ChatMessage) -> String {
    match message.content() {
        MessageContent::Text(text) => format!("[text] {text}"),
        MessageContent::Image(reference) => format!("[image] {reference}"),
    }
}

/// Entries on the timeline tab.
pub const TIMELINE_LEN: usize = 999;
const TIMELINE_PREVIEW_LEN: usize = 5;

/// First timeline entries plus a count of the rest.
pub fn timeline_preview() -> Vec<String> {
    let mut lines = (1..=TIMELINE_PREVIEW_LEN)
        .map(|index| format!("Item {index}"))
        .collect::<Vec<_>>();
    lines.push(format!("... {} more", TIMELINE_LEN - TIMELINE_PREVIEW_LEN));
    lines
}
