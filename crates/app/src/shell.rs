use photochat_chat::{ChatSession, MediaKind, MediaPicker, PickerOutcome, SessionEvent};
use photochat_settings::{PreferencesError, PreferencesStore, Tab};
use snafu::{ResultExt, Snafu};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::console::{Command, HELP_TEXT, render_message, timeline_preview};

/// Picker collaborator for a terminal: the "native UI" is the user typing `/pick` or `/cancel`.
#[derive(Debug, Default)]
pub struct ConsolePicker;

impl MediaPicker for ConsolePicker {
    fn present(&mut self, kind: MediaKind) {
        tracing::debug!(%kind, "console picker awaiting /pick or /cancel");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Continue(Vec<String>),
    Quit,
}

/// Rendering collaborator: feeds commands into the chat session and preferences, then
/// renders whatever the session reports.
pub struct Shell {
    session: ChatSession<ConsolePicker>,
    preferences: PreferencesStore,
}

impl Shell {
    pub fn new(preferences: PreferencesStore) -> Self {
        Self {
            session: ChatSession::new(ConsolePicker),
            preferences,
        }
    }

    pub fn greeting(&self) -> String {
        let preferences = self.preferences.preferences();
        format!(
            "Welcome, {}. Chat is open (tab: {:?}). Type /help for commands.",
            preferences.name, preferences.tab
        )
    }

    pub fn handle(&mut self, command: Command) -> Reply {
        let mut lines = Vec::new();
        match command {
            Command::Send(draft) => {
                self.session.send_text(draft);
            }
            Command::Attach(kind) => {
                let _ = self.session.begin_attach(kind);
            }
            Command::Pick(reference) => {
                self.session.on_picker_result(PickerOutcome::Resolved(reference));
            }
            Command::Cancel => {
                self.session.on_picker_result(PickerOutcome::Cancelled);
            }
            Command::Messages => {
                let messages = self.session.messages();
                if messages.is_empty() {
                    lines.push("(no messages)".to_string());
                }
                lines.extend(
                    messages
                        .iter()
                        .map(|message| format!("{} {}", message.id(), render_message(message))),
                );
            }
            Command::Show(id) => {
                let line = match self.session.messages().find(id) {
                    Some(message) => render_message(message),
                    None => format!("no message with id {id}"),
                };
                lines.push(line);
            }
            Command::Name(name) => {
                lines.push(self.save(|store| store.set_name(name), "display name updated"));
            }
            Command::Appearance(appearance) => {
                lines.push(self.save(
                    |store| store.set_appearance(appearance),
                    "appearance updated",
                ));
            }
            Command::Tab(tab) => {
                lines.push(self.save(|store| store.set_tab(tab), "active tab updated"));
                if tab == Tab::Timeline {
                    lines.extend(timeline_preview());
                }
            }
            Command::Help => lines.push(HELP_TEXT.to_string()),
            Command::Quit => return Reply::Quit,
            Command::Invalid(message) => lines.push(message),
        }

        lines.extend(self.render_events());
        Reply::Continue(lines)
    }

    fn save(
        &self,
        change: impl FnOnce(&PreferencesStore) -> Result<(), PreferencesError>,
        confirmation: &str,
    ) -> String {
        match change(&self.preferences) {
            Ok(()) => confirmation.to_string(),
            Err(error) => format!("Error: {error}"),
        }
    }

    fn render_events(&mut self) -> Vec<String> {
        let messages = self.session.messages();
        self.session
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                SessionEvent::PickerRequested(kind) => {
                    Some(format!("{kind} picker open: /pick <locator> or /cancel"))
                }
                SessionEvent::MessageAppended(id) => messages
                    .iter()
                    .find(|message| message.id() == id)
                    .map(render_message),
                SessionEvent::SelectionCancelled(kind) => {
                    Some(format!("{kind} selection cancelled"))
                }
                SessionEvent::AttachRejected { active, .. } => {
                    Some(format!("a {active} picker is already open"))
                }
                SessionEvent::StaleCallbackIgnored => Some("no picker is open".to_string()),
            })
            .collect()
    }
}

#[derive(Debug, Snafu)]
pub enum ShellError {
    #[snafu(display("failed to read console input on `{stage}`: {source}"))]
    ReadInput {
        stage: &'static str,
        source: std::io::Error,
    },
    #[snafu(display("failed to write console output on `{stage}`: {source}"))]
    WriteOutput {
        stage: &'static str,
        source: std::io::Error,
    },
}

pub async fn run(shell: &mut Shell) -> Result<(), ShellError> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    write_lines(&mut stdout, &[shell.greeting()]).await?;
    while let Some(line) = lines.next_line().await.context(ReadInputSnafu {
        stage: "read-console-line",
    })? {
        match shell.handle(Command::parse(&line)) {
            Reply::Continue(output) => write_lines(&mut stdout, &output).await?,
            Reply::Quit => break,
        }
    }

    tracing::info!("console shell finished");
    Ok(())
}

async fn write_lines(stdout: &mut tokio::io::Stdout, lines: &[String]) -> Result<(), ShellError> {
    for line in lines {
        stdout
            .write_all(format!("{line}\n").as_bytes())
            .await
            .context(WriteOutputSnafu {
                stage: "write-console-line",
            })?;
    }
    stdout.flush().await.context(WriteOutputSnafu {
        stage: "flush-console-output",
    })
}
