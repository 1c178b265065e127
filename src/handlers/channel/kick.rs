//! KICK command handler.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};
use async_trait::async_trait;
use relay_proto::Message;
use std::sync::Arc;
use tracing::info;

/// Handler for KICK command.
///
/// `KICK <channel> <nick> [<reason>]`
///
/// Only channel operators may kick. The kick notice reaches everyone who
/// was a member when the kick happened, the target included. The reason
/// defaults to the kicker's nick.
pub struct KickHandler;

#[async_trait]
impl Handler for KickHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let (Some(name), Some(target_nick)) = (msg.arg(0), msg.arg(1)) else {
            return Err(HandlerError::NeedMoreParams("KICK"));
        };

        let channel = ctx
            .matrix
            .channels
            .lookup(name)
            .ok_or_else(|| HandlerError::NoSuchChannel(name.to_string()))?;
        let chan_name = channel.name().to_string();

        if !channel.is_member(ctx.session) {
            return Err(HandlerError::NotOnChannel(chan_name));
        }
        if !channel.is_operator(ctx.session) {
            return Err(HandlerError::ChanOpPrivsNeeded(chan_name));
        }

        if !ctx.matrix.nicks.is_taken(target_nick) {
            return Err(HandlerError::NoSuchNick(target_nick.to_string()));
        }
        let target = channel
            .member_by_nick(target_nick)
            .ok_or_else(|| HandlerError::UserNotInChannel(target_nick.to_string(), chan_name.clone()))?;

        let kicker = ctx.session.nick_or_star();
        let reason = msg.arg(2).unwrap_or(&kicker).to_string();
        let target_name = target.nick_or_star();

        let notice = Message::new("KICK", vec![chan_name.clone(), target_name.clone()])
            .with_prefix(ctx.session.hostmask())
            .with_trailing(reason.as_str());
        let audience = channel.members();
        ctx.matrix.channels.remove_member(&channel, &target);
        channel.deliver(&audience, &Arc::new(notice));

        info!(channel = %chan_name, kicker = %kicker, target = %target_name, reason = %reason, "User kicked");
        Ok(())
    }
}
