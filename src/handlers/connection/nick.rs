//! NICK command handler.

use super::welcome::try_complete_registration;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};
use async_trait::async_trait;
use relay_proto::{Message, NickExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Handler for NICK command.
///
/// Before registration the nick is only checked and remembered; it is
/// claimed when registration completes. Afterwards the registry entry is
/// renamed atomically and the change is announced to the client and
/// everyone sharing a channel with it.
pub struct NickHandler;

#[async_trait]
impl Handler for NickHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        // NICK <nickname>
        let nick = msg
            .arg(0)
            .filter(|n| !n.is_empty())
            .ok_or(HandlerError::NoNicknameGiven)?;

        if !nick.is_valid_nick() {
            return Err(HandlerError::ErroneousNickname(nick.to_string()));
        }

        let state = ctx.session.registration();

        let Some(old_nick) = state.nick.filter(|_| state.registered) else {
            if ctx.matrix.nicks.is_taken(nick) {
                return Err(HandlerError::NicknameInUse(nick.to_string()));
            }
            ctx.session.set_nick(Some(nick.to_string()));
            debug!(nick = %nick, "Nick set");
            return try_complete_registration(ctx);
        };

        if old_nick == nick {
            return Ok(());
        }

        let old_mask = ctx.session.hostmask();
        ctx.matrix.nicks.rename(&old_nick, nick, ctx.session)?;
        ctx.session.set_nick(Some(nick.to_string()));
        info!(old = %old_nick, new = %nick, "Nick changed");

        let notice = Arc::new(Message::new("NICK", vec![nick.to_string()]).with_prefix(old_mask));
        ctx.send(Arc::clone(&notice))?;
        for peer in ctx.matrix.channels.neighbors(ctx.session) {
            if let Err(e) = peer.send(Arc::clone(&notice)) {
                warn!(session = peer.id(), error = %e, "Failed to deliver NICK notice");
            }
        }

        Ok(())
    }
}
