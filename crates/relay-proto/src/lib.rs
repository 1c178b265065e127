//! # relay-proto
//!
//! Protocol layer for the relayd chat server: a line-oriented subset of
//! IRC.
//!
//! ## Features
//!
//! - Message parsing and serialization (`[':' prefix SP] command *(SP middle) [SP ':' trailing]`)
//! - Closed command set with a total name mapping
//! - Numeric reply catalog
//! - Nickname case-mapping and channel-name folding
//! - Optional Tokio line codec with lossy UTF-8 decoding
//!
//! ## Quick Start
//!
//! ```rust
//! use relay_proto::{Command, Message};
//!
//! let msg: Message = "PRIVMSG #chan :hello world".parse().expect("valid line");
//! assert_eq!(msg.kind(), Command::PRIVMSG);
//! assert_eq!(msg.params, vec!["#chan", "hello world"]);
//!
//! let out = Message::new("JOIN", vec!["#chan".into()]).with_prefix("alice!a@host");
//! assert_eq!(out.to_string(), ":alice!a@host JOIN #chan\r\n");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod chan;
pub mod command;
pub mod error;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod nick;
pub mod response;

pub use self::casemap::{irc_eq, irc_lower_char, irc_to_lower};
pub use self::chan::{CHANNEL_MAX_LEN, ChannelExt, channel_to_lower};
pub use self::command::Command;
pub use self::error::ProtocolError;
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::message::Message;
pub use self::nick::{NICK_MAX_LEN, NickExt};
pub use self::response::Response;
