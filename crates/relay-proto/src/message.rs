//! Protocol messages.
//!
//! A [`Message`] is one line of the protocol with its optional source
//! prefix, command name and parameters:
//!
//! ```text
//! [':' prefix SP] command *(SP middle) [SP ':' trailing] CRLF
//! ```

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::command::Command;
use crate::error::{ProtocolError, Result};
use crate::response::Response;

/// A single protocol message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Source of the message (`nick!user@host` or a server name).
    pub prefix: Option<String>,
    /// Command name, uppercased when parsed.
    pub command: String,
    /// Positional parameters; the last one may contain spaces.
    pub params: Vec<String>,
    /// Force the last parameter to be written in trailing (`:`) form.
    pub trailing: bool,
}

impl Message {
    /// Create a message without prefix.
    pub fn new(command: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            prefix: None,
            command: command.into(),
            params,
            trailing: false,
        }
    }

    /// Set the source prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Append a free-form final parameter, always written after `:`.
    pub fn with_trailing(mut self, text: impl Into<String>) -> Self {
        self.params.push(text.into());
        self.trailing = true;
        self
    }

    /// Parse one line.
    ///
    /// Surrounding whitespace (including CR/LF) is ignored. Fails with
    /// [`ProtocolError::MalformedMessage`] on an empty line, a prefix with
    /// no command after it, or a line with no command token.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ProtocolError::MalformedMessage("empty line"));
        }

        let (prefix, rest) = match line.strip_prefix(':') {
            Some(stripped) => match stripped.split_once(' ') {
                Some((prefix, rest)) => (Some(prefix.to_string()), rest),
                None => return Err(ProtocolError::MalformedMessage("prefix without command")),
            },
            None => (None, line),
        };

        let (middle, trailing) = match rest.split_once(" :") {
            Some((middle, trailing)) => (middle, Some(trailing)),
            None => (rest, None),
        };

        let mut tokens = middle.split_whitespace();
        let command = tokens
            .next()
            .ok_or(ProtocolError::MalformedMessage("missing command"))?
            .to_ascii_uppercase();

        let mut params: Vec<String> = tokens.map(str::to_string).collect();
        if let Some(trailing) = trailing {
            params.push(trailing.to_string());
        }

        Ok(Self {
            prefix,
            command,
            params,
            trailing: trailing.is_some(),
        })
    }

    /// The command this message carries.
    pub fn kind(&self) -> Command {
        Command::from_name(&self.command)
    }

    /// Positional argument by index.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// The numeric reply, if the command is a known three-digit code.
    pub fn response(&self) -> Option<Response> {
        if self.command.len() != 3 || !self.command.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.command.parse::<u16>().ok().and_then(Response::from_code)
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Message::parse(s)
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(ref prefix) = self.prefix {
            write!(f, ":{} ", prefix)?;
        }

        f.write_str(&self.command)?;

        if let Some((last, middle)) = self.params.split_last() {
            for param in middle {
                write!(f, " {}", param)?;
            }

            let needs_colon =
                self.trailing || last.is_empty() || last.contains(' ') || last.starts_with(':');
            if needs_colon {
                write!(f, " :{}", last)?;
            } else {
                write!(f, " {}", last)?;
            }
        }

        f.write_str("\r\n")
    }
}
