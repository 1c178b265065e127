//! JOIN command handler.

use crate::error::{HandlerError, HandlerResult, RegistryError};
use crate::handlers::helpers::names_replies;
use crate::handlers::{Context, Handler};
use async_trait::async_trait;
use relay_proto::Message;
use std::sync::Arc;
use tracing::debug;

/// Handler for JOIN command.
///
/// `JOIN <channel>`
///
/// Creates the channel on first join. The join notice goes to every
/// member, the joiner included, followed by the member list for the joiner.
pub struct JoinHandler;

#[async_trait]
impl Handler for JoinHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let name = msg.arg(0).ok_or(HandlerError::NeedMoreParams("JOIN"))?;

        let (channel, added) = ctx
            .matrix
            .channels
            .join(name, ctx.session)
            .map_err(|e| match e {
                RegistryError::InvalidName(_) => HandlerError::NoSuchChannel(name.to_string()),
                other => other.into(),
            })?;
        if !added {
            debug!(channel = %channel.name(), "Already a member, ignoring JOIN");
            return Ok(());
        }

        let notice = Arc::new(
            Message::new("JOIN", vec![channel.name().to_string()])
                .with_prefix(ctx.session.hostmask()),
        );
        channel.broadcast(&notice, None);

        let nick = ctx.session.nick_or_star();
        for reply in names_replies(ctx.server_name(), &nick, &channel) {
            ctx.send(reply)?;
        }

        debug!(channel = %channel.name(), nick = %nick, "Joined channel");
        Ok(())
    }
}
