//! PART command handler.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};
use async_trait::async_trait;
use relay_proto::Message;
use std::sync::Arc;

/// Handler for PART command.
///
/// `PART <channel> [<reason>]`
pub struct PartHandler;

#[async_trait]
impl Handler for PartHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let name = msg.arg(0).ok_or(HandlerError::NeedMoreParams("PART"))?;

        let channel = ctx
            .matrix
            .channels
            .lookup(name)
            .ok_or_else(|| HandlerError::NoSuchChannel(name.to_string()))?;

        if !channel.is_member(ctx.session) {
            return Err(HandlerError::NotOnChannel(channel.name().to_string()));
        }

        let mut notice = Message::new("PART", vec![channel.name().to_string()])
            .with_prefix(ctx.session.hostmask());
        if let Some(reason) = msg.arg(1) {
            notice = notice.with_trailing(reason);
        }

        // Leave first so nothing sent after the notice can still reach us
        let audience = channel.members();
        ctx.matrix.channels.remove_member(&channel, ctx.session);
        channel.deliver(&audience, &Arc::new(notice));
        Ok(())
    }
}
