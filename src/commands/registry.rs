use super::CommandResult;
use crate::core::conversation::ConversationController;

pub type CommandHandler = fn(&mut ConversationController, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands.",
        handler: super::handle_help,
    },
    Command {
        name: "clear",
        usage: "/clear",
        help: "Empty the transcript and dismiss any error.",
        handler: super::handle_clear,
    },
    Command {
        name: "dismiss",
        usage: "/dismiss",
        help: "Dismiss the last error banner.",
        handler: super::handle_dismiss,
    },
    Command {
        name: "status",
        usage: "/status",
        help: "Show whether a reply is pending and the last error.",
        handler: super::handle_status,
    },
    Command {
        name: "dump",
        usage: "/dump [filename]",
        help: "Export the conversation state as JSON.",
        handler: super::handle_dump,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Leave the chat.",
        handler: super::handle_quit,
    },
    Command {
        name: "exit",
        usage: "/exit",
        help: "Leave the chat.",
        handler: super::handle_quit,
    },
];
