//! PRIVMSG command handler.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};
use async_trait::async_trait;
use relay_proto::Message;
use std::sync::Arc;
use tracing::{debug, warn};

/// Handler for PRIVMSG command.
///
/// `PRIVMSG <target> <text>`
///
/// A `#` target is relayed to the other channel members and requires the
/// sender to be one of them. Any other target is a nickname and gets the
/// message directly.
pub struct PrivmsgHandler;

#[async_trait]
impl Handler for PrivmsgHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let (Some(target), Some(text)) = (msg.arg(0), msg.arg(1)) else {
            return Err(HandlerError::NoRecipient("PRIVMSG"));
        };

        let relayed = Message::new("PRIVMSG", vec![target.to_string()])
            .with_prefix(ctx.session.hostmask())
            .with_trailing(text);

        if target.starts_with('#') {
            let channel = ctx
                .matrix
                .channels
                .lookup(target)
                .ok_or_else(|| HandlerError::NoSuchNick(target.to_string()))?;

            if !channel.is_member(ctx.session) {
                return Err(HandlerError::CannotSendToChannel(channel.name().to_string()));
            }

            let delivered = channel.broadcast(&Arc::new(relayed), Some(ctx.session));
            debug!(channel = %channel.name(), delivered, "Channel message relayed");
            return Ok(());
        }

        let recipient = ctx
            .matrix
            .nicks
            .lookup(target)
            .ok_or_else(|| HandlerError::NoSuchNick(target.to_string()))?;

        if let Err(e) = recipient.send(relayed) {
            warn!(target = %target, error = %e, "Direct message not delivered");
        }
        Ok(())
    }
}
