//! Line protocol for the interactive `chat` command.

#[cfg(test)]
#[path = "repl_test.rs"]
mod repl_test;

use leadchat::{Message, Role};

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Say(&'a str),
    Agree,
    Explore(Option<&'a str>),
    Help,
    Quit,
    Blank,
    Unknown(&'a str),
}

pub const HELP: &str = "plain text sends a message; /agree saves the plan; /explore [preferences] asks for an alternative; /quit exits";

pub fn parse_line(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return Line::Say(trimmed);
    };
    let (name, rest) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
    let rest = rest.trim();
    match name {
        "agree" => Line::Agree,
        "explore" => Line::Explore((!rest.is_empty()).then_some(rest)),
        "help" => Line::Help,
        "quit" | "exit" => Line::Quit,
        _ => Line::Unknown(name),
    }
}

/// Terminal rendering of one transcript entry.
pub fn render(message: &Message) -> String {
    let label = match message.role() {
        Role::User => "you",
        Role::Assistant => "advisor",
        Role::Error => "error",
    };
    format!("{label}> {}", message.content())
}
