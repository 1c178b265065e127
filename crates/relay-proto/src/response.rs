//! Numeric replies sent by the server.
//!
//! Only the numerics the server actually emits are listed. Codes are
//! always written as three zero-padded digits.

#![allow(non_camel_case_types)]

use std::fmt;

/// Server numeric reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Response {
    /// 001 - Welcome
    RPL_WELCOME = 1,
    /// 353 - Channel member list
    RPL_NAMREPLY = 353,
    /// 366 - End of member list
    RPL_ENDOFNAMES = 366,
    /// 401 - No such nick/channel
    ERR_NOSUCHNICK = 401,
    /// 403 - No such channel
    ERR_NOSUCHCHANNEL = 403,
    /// 404 - Cannot send to channel
    ERR_CANNOTSENDTOCHAN = 404,
    /// 411 - No recipient given
    ERR_NORECIPIENT = 411,
    /// 421 - Unknown command
    ERR_UNKNOWNCOMMAND = 421,
    /// 431 - No nickname given
    ERR_NONICKNAMEGIVEN = 431,
    /// 432 - Erroneous nickname
    ERR_ERRONEUSNICKNAME = 432,
    /// 433 - Nickname is already in use
    ERR_NICKNAMEINUSE = 433,
    /// 441 - Target is not on that channel
    ERR_USERNOTINCHANNEL = 441,
    /// 442 - You're not on that channel
    ERR_NOTONCHANNEL = 442,
    /// 451 - You have not registered
    ERR_NOTREGISTERED = 451,
    /// 461 - Not enough parameters
    ERR_NEEDMOREPARAMS = 461,
    /// 462 - You may not reregister
    ERR_ALREADYREGISTRED = 462,
    /// 464 - Password incorrect
    ERR_PASSWDMISMATCH = 464,
    /// 482 - You're not channel operator
    ERR_CHANOPRIVSNEEDED = 482,
}

impl Response {
    /// Numeric value of this reply.
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Look up a reply by its numeric value.
    pub fn from_code(code: u16) -> Option<Response> {
        let resp = match code {
            1 => Self::RPL_WELCOME,
            353 => Self::RPL_NAMREPLY,
            366 => Self::RPL_ENDOFNAMES,
            401 => Self::ERR_NOSUCHNICK,
            403 => Self::ERR_NOSUCHCHANNEL,
            404 => Self::ERR_CANNOTSENDTOCHAN,
            411 => Self::ERR_NORECIPIENT,
            421 => Self::ERR_UNKNOWNCOMMAND,
            431 => Self::ERR_NONICKNAMEGIVEN,
            432 => Self::ERR_ERRONEUSNICKNAME,
            433 => Self::ERR_NICKNAMEINUSE,
            441 => Self::ERR_USERNOTINCHANNEL,
            442 => Self::ERR_NOTONCHANNEL,
            451 => Self::ERR_NOTREGISTERED,
            461 => Self::ERR_NEEDMOREPARAMS,
            462 => Self::ERR_ALREADYREGISTRED,
            464 => Self::ERR_PASSWDMISMATCH,
            482 => Self::ERR_CHANOPRIVSNEEDED,
            _ => return None,
        };
        Some(resp)
    }

    /// Check if this is an error reply (4xx).
    pub fn is_error(&self) -> bool {
        (400..500).contains(&self.code())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}
