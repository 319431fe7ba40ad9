//! Slash commands available inside the chat loop.

mod registry;

pub use registry::{all_commands, find_command, Command, CommandInvocation};

use crate::core::conversation::ConversationController;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};

#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    Notice(String),
    Quit,
    ProcessAsMessage(String),
}

/// Route one line of user input. Anything that is not a known slash command
/// is treated as a message.
pub fn process_input(controller: &mut ConversationController, input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match find_command(command_name) {
        Some(command) => (command.handler)(controller, CommandInvocation { args }),
        None => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

pub fn help_text() -> String {
    let mut help = String::from("Commands:\n");
    for command in all_commands() {
        help.push_str(&format!("  {:<18} {}\n", command.usage, command.help));
    }
    help.push_str("Anything else is sent to the chat service.");
    help
}

pub(super) fn handle_help(
    _controller: &mut ConversationController,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::Notice(help_text())
}

pub(super) fn handle_clear(
    controller: &mut ConversationController,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    controller.clear_conversation();
    if controller.is_pending() {
        CommandResult::Notice(
            "Conversation cleared. The reply already in flight will still appear.".to_string(),
        )
    } else {
        CommandResult::Notice("Conversation cleared.".to_string())
    }
}

pub(super) fn handle_dismiss(
    controller: &mut ConversationController,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    controller.dismiss_error();
    CommandResult::Continue
}

pub(super) fn handle_status(
    controller: &mut ConversationController,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    let pending = if controller.is_pending() {
        "waiting for a reply"
    } else {
        "idle"
    };
    let error = controller.last_error().unwrap_or("none");
    CommandResult::Notice(format!(
        "Status: {pending}\nEntries: {}\nLast error: {error}",
        controller.transcript().len()
    ))
}

pub(super) fn handle_dump(
    controller: &mut ConversationController,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    let parts: Vec<&str> = invocation.args.split_whitespace().collect();
    let filename = match parts.as_slice() {
        [] => format!("parley-{}.json", Utc::now().format("%Y-%m-%d-%H%M%S")),
        [name] => (*name).to_string(),
        _ => return CommandResult::Notice("Usage: /dump [filename]".to_string()),
    };

    match dump_conversation(controller, &filename) {
        Ok(()) => CommandResult::Notice(format!("Dumped: {filename}")),
        Err(e) => CommandResult::Notice(format!("Dump error: {e}")),
    }
}

pub(super) fn handle_quit(
    _controller: &mut ConversationController,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    CommandResult::Quit
}

/// Write the conversation state to a new file; existing files are never
/// overwritten.
pub fn dump_conversation(
    controller: &ConversationController,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(filename)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, controller.state())?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
