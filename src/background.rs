/// Keyboard shortcut handler for the background script.
///
/// Shortcuts go through the pending delta queue so rapid key presses only
/// append a record; the list is rewritten on the next open, export or
/// immediate mutation.

use crate::browser::{ChromeStorage, active_tab_url, notify_outcome, stash_service};
use crate::error::Result;
use crate::service::StashService;
use crate::storage::KeyValueStore;

/// Commands declared in the extension manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Remove,
    Bump,
}

impl Command {
    pub fn parse(name: &str) -> Option<Command> {
        match name {
            "add" => Some(Command::Add),
            "remove" => Some(Command::Remove),
            "bump" => Some(Command::Bump),
            _ => None,
        }
    }
}

/// Enqueue the delta for `command`. Returns the notification shown on success.
pub async fn run_command<S: KeyValueStore>(
    service: &StashService<S>,
    command: Command,
    url: &str,
) -> Result<String> {
    match command {
        Command::Add => {
            service.enqueue_add(url).await?;
            Ok("Add successful!".to_string())
        }
        Command::Remove => {
            service.enqueue_remove(url).await?;
            Ok("Remove successful!".to_string())
        }
        Command::Bump => {
            let amount = service.get_settings().await?.default_bump;
            service.enqueue_bump(url, amount).await?;
            Ok(format!("Successfully bumped item by {}", amount))
        }
    }
}

fn action_name(command: Command) -> &'static str {
    match command {
        Command::Add => "Add",
        Command::Remove => "Remove",
        Command::Bump => "Bump",
    }
}

pub async fn handle_command(name: &str) {
    let Some(command) = Command::parse(name) else {
        log::debug!("Ignoring unknown command {}", name);
        return;
    };

    let service: StashService<ChromeStorage> = stash_service();
    let result = async {
        let url = active_tab_url().await?;
        run_command(&service, command, &url).await
    }
    .await;

    let success = result.as_deref().unwrap_or_default().to_string();
    notify_outcome(action_name(command), &success, &result);
}
