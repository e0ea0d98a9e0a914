//! Chat command parsing.

use crate::auth::Role;

/// A recognized chat command with its raw argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/auth <password>`
    Auth(String),
    /// `/search <term>`
    Search(String),
    /// `/get<code>`
    Get(String),
    /// `/download <magnet>`
    Download(String),
}

impl Command {
    /// Parse a chat message. Returns `None` for plain text and unknown
    /// commands, which the bot ignores.
    ///
    /// A `@botname` suffix on the command word (as Telegram sends in group
    /// chats) is dropped.
    pub fn parse(text: &str) -> Option<Command> {
        let rest = text.trim_start().strip_prefix('/')?;

        let (word, argument) = match rest.find(char::is_whitespace) {
            Some(i) => (&rest[..i], rest[i..].trim()),
            None => (rest, ""),
        };
        let word = word.split('@').next().unwrap_or(word);

        match word {
            "auth" => Some(Command::Auth(argument.to_string())),
            "search" => Some(Command::Search(argument.to_string())),
            "download" => Some(Command::Download(argument.to_string())),
            "get" => Some(Command::Get(argument.to_string())),
            _ => word
                .strip_prefix("get")
                .map(|code| Command::Get(code.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Auth(_) => "auth",
            Command::Search(_) => "search",
            Command::Get(_) => "get",
            Command::Download(_) => "download",
        }
    }

    /// Access level the route for this command requires.
    pub fn required_role(&self) -> Role {
        match self {
            Command::Auth(_) => Role::Guest,
            Command::Search(_) | Command::Get(_) | Command::Download(_) => Role::Member,
        }
    }
}
