//! The closed set of client commands understood by the server.

#![allow(clippy::upper_case_acronyms)]

use std::fmt;

/// A client command name.
///
/// The mapping from names is total: anything outside the supported subset
/// becomes [`Command::Unknown`] carrying the (uppercased) name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// `PASS <password>`
    PASS,
    /// `NICK <nickname>`
    NICK,
    /// `USER <username> <mode> <unused> <realname>`
    USER,
    /// `JOIN <channel>`
    JOIN,
    /// `PART <channel> [<reason>]`
    PART,
    /// `PRIVMSG <target> <text>`
    PRIVMSG,
    /// `KICK <channel> <nick> [<reason>]`
    KICK,
    /// `QUIT [<reason>]`
    QUIT,
    /// Any other command name.
    Unknown(String),
}

impl Command {
    /// Map a command name, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "PASS" => Self::PASS,
            "NICK" => Self::NICK,
            "USER" => Self::USER,
            "JOIN" => Self::JOIN,
            "PART" => Self::PART,
            "PRIVMSG" => Self::PRIVMSG,
            "KICK" => Self::KICK,
            "QUIT" => Self::QUIT,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The canonical wire name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::PASS => "PASS",
            Self::NICK => "NICK",
            Self::USER => "USER",
            Self::JOIN => "JOIN",
            Self::PART => "PART",
            Self::PRIVMSG => "PRIVMSG",
            Self::KICK => "KICK",
            Self::QUIT => "QUIT",
            Self::Unknown(name) => name,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
