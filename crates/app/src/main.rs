mod console;
mod shell;

use photochat_settings::PreferencesStore;

use crate::shell::Shell;

/// Console entry point.
///
/// Loads persisted preferences and drives a chat session from stdin. Logs go to stderr so
/// they never interleave with rendered messages.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let mut console_shell = Shell::new(PreferencesStore::load());
    if let Err(error) = shell::run(&mut console_shell).await {
        tracing::error!("console shell stopped: {}", error);
        std::process::exit(1);
    }
}
