//! Helper functions for command handlers.

use crate::state::Channel;
use relay_proto::{Message, Response};

/// Helper to create a server reply message (numeric response).
///
/// `params` starts with the target nick; the last one is written in
/// trailing form.
pub fn server_reply(server_name: &str, response: Response, params: Vec<String>) -> Message {
    let mut msg = Message::new(response.to_string(), params).with_prefix(server_name);
    msg.trailing = true;
    msg
}

/// The 353/366 pair describing `channel`'s membership.
pub fn names_replies(server_name: &str, nick: &str, channel: &Channel) -> [Message; 2] {
    [
        server_reply(
            server_name,
            Response::RPL_NAMREPLY,
            vec![
                nick.to_string(),
                "=".to_string(),
                channel.name().to_string(),
                channel.names().join(" "),
            ],
        ),
        server_reply(
            server_name,
            Response::RPL_ENDOFNAMES,
            vec![
                nick.to_string(),
                channel.name().to_string(),
                "End of /NAMES list".to_string(),
            ],
        ),
    ]
}
