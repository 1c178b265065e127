//! Unified error handling for relayd.
//!
//! Handler failures map 1:1 onto numeric replies; registry contention is a
//! separate enum so the registries stay independent of the handler layer.

use relay_proto::{Message, Response};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;

use crate::handlers::server_reply;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters for {0}")]
    NeedMoreParams(&'static str),

    #[error("not registered")]
    NotRegistered,

    #[error("already registered")]
    AlreadyRegistered,

    #[error("no nickname given")]
    NoNicknameGiven,

    #[error("erroneous nickname: {0}")]
    ErroneousNickname(String),

    #[error("nickname in use: {0}")]
    NicknameInUse(String),

    #[error("no such channel: {0}")]
    NoSuchChannel(String),

    #[error("not on channel: {0}")]
    NotOnChannel(String),

    #[error("user {0} is not on channel {1}")]
    UserNotInChannel(String, String),

    #[error("channel operator privileges needed on {0}")]
    ChanOpPrivsNeeded(String),

    #[error("cannot send to channel: {0}")]
    CannotSendToChannel(String),

    #[error("no such nick/channel: {0}")]
    NoSuchNick(String),

    #[error("no recipient given for {0}")]
    NoRecipient(&'static str),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Credential did not match; fatal to the connection.
    #[error("password mismatch")]
    PasswordMismatch,

    /// Own outbound queue is closed or full.
    #[error("send error: {0}")]
    Send(#[from] TrySendError<Arc<Message>>),

    #[error("client quit: {0}")]
    Quit(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams(_) => "need_more_params",
            Self::NotRegistered => "not_registered",
            Self::AlreadyRegistered => "already_registered",
            Self::NoNicknameGiven => "no_nickname_given",
            Self::ErroneousNickname(_) => "erroneous_nickname",
            Self::NicknameInUse(_) => "nickname_in_use",
            Self::NoSuchChannel(_) => "no_such_channel",
            Self::NotOnChannel(_) => "not_on_channel",
            Self::UserNotInChannel(..) => "user_not_in_channel",
            Self::ChanOpPrivsNeeded(_) => "chanop_privs_needed",
            Self::CannotSendToChannel(_) => "cannot_send_to_channel",
            Self::NoSuchNick(_) => "no_such_nick",
            Self::NoRecipient(_) => "no_recipient",
            Self::UnknownCommand(_) => "unknown_command",
            Self::PasswordMismatch => "password_mismatch",
            Self::Send(_) => "send_error",
            Self::Quit(_) => "quit",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Whether this error ends the connection that caused it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PasswordMismatch | Self::Send(_) | Self::Quit(_))
    }

    /// Convert to a numeric reply addressed to `nick`.
    ///
    /// Returns `None` for errors that don't warrant a client-visible reply.
    pub fn to_irc_reply(&self, server_name: &str, nick: &str) -> Option<Message> {
        let nick = nick.to_string();
        let (response, params) = match self {
            Self::NeedMoreParams(cmd) => (
                Response::ERR_NEEDMOREPARAMS,
                vec![nick, cmd.to_string(), "Not enough parameters".to_string()],
            ),
            Self::NotRegistered => (
                Response::ERR_NOTREGISTERED,
                vec![nick, "You have not registered".to_string()],
            ),
            Self::AlreadyRegistered => (
                Response::ERR_ALREADYREGISTRED,
                vec![nick, "You may not reregister".to_string()],
            ),
            Self::NoNicknameGiven => (
                Response::ERR_NONICKNAMEGIVEN,
                vec![nick, "No nickname given".to_string()],
            ),
            Self::ErroneousNickname(bad) => (
                Response::ERR_ERRONEUSNICKNAME,
                vec![nick, bad.clone(), "Erroneous nickname".to_string()],
            ),
            Self::NicknameInUse(taken) => (
                Response::ERR_NICKNAMEINUSE,
                vec![nick, taken.clone(), "Nickname is already in use".to_string()],
            ),
            Self::NoSuchChannel(chan) => (
                Response::ERR_NOSUCHCHANNEL,
                vec![nick, chan.clone(), "No such channel".to_string()],
            ),
            Self::NotOnChannel(chan) => (
                Response::ERR_NOTONCHANNEL,
                vec![nick, chan.clone(), "You're not on that channel".to_string()],
            ),
            Self::UserNotInChannel(target, chan) => (
                Response::ERR_USERNOTINCHANNEL,
                vec![
                    nick,
                    target.clone(),
                    chan.clone(),
                    "They aren't on that channel".to_string(),
                ],
            ),
            Self::ChanOpPrivsNeeded(chan) => (
                Response::ERR_CHANOPRIVSNEEDED,
                vec![nick, chan.clone(), "You're not channel operator".to_string()],
            ),
            Self::CannotSendToChannel(chan) => (
                Response::ERR_CANNOTSENDTOCHAN,
                vec![nick, chan.clone(), "Cannot send to channel".to_string()],
            ),
            Self::NoSuchNick(target) => (
                Response::ERR_NOSUCHNICK,
                vec![nick, target.clone(), "No such nick/channel".to_string()],
            ),
            Self::NoRecipient(cmd) => (
                Response::ERR_NORECIPIENT,
                vec![nick, format!("No recipient given ({})", cmd)],
            ),
            Self::UnknownCommand(cmd) => (
                Response::ERR_UNKNOWNCOMMAND,
                vec![nick, cmd.clone(), "Unknown command".to_string()],
            ),
            Self::PasswordMismatch => (
                Response::ERR_PASSWDMISMATCH,
                vec![nick, "Password incorrect".to_string()],
            ),

            // These errors don't get client-visible replies
            Self::Send(_) | Self::Quit(_) | Self::Internal(_) => return None,
        };

        Some(server_reply(server_name, response, params))
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

// ============================================================================
// Registry Errors (shared state contention)
// ============================================================================

/// Failures raised by the nickname and channel registries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("nickname {0} is already in use")]
    NicknameInUse(String),

    #[error("channel {0} already exists")]
    AlreadyExists(String),

    #[error("invalid channel name: {0}")]
    InvalidName(String),
}

impl From<RegistryError> for HandlerError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NicknameInUse(nick) => Self::NicknameInUse(nick),
            RegistryError::InvalidName(name) => Self::NoSuchChannel(name),
            RegistryError::AlreadyExists(name) => {
                Self::Internal(format!("channel {} created concurrently", name))
            }
        }
    }
}
