//! Registration completion.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::Context;
use relay_proto::Response;
use tracing::{info, warn};

/// Finish registration if NICK and USER are both known.
///
/// Checks the password (if the server has one), claims the pending nick
/// and sends the welcome. A nick lost to another client in the meantime is
/// reverted to unset so the client can pick another.
pub fn try_complete_registration(ctx: &Context<'_>) -> HandlerResult {
    let state = ctx.session.registration();
    if !state.can_register() {
        return Ok(());
    }
    let (Some(nick), Some(user)) = (state.nick, state.user) else {
        return Ok(());
    };

    if let Some(expected) = ctx.matrix.password.as_deref()
        && state.pass_attempt.as_deref() != Some(expected)
    {
        warn!(session = ctx.session.id(), nick = %nick, "Registration rejected: bad password");
        return Err(HandlerError::PasswordMismatch);
    }

    if ctx.matrix.nicks.register(&nick, ctx.session).is_err() {
        warn!(session = ctx.session.id(), nick = %nick, "Nick taken before registration completed");
        ctx.session.set_nick(None);
        return Err(HandlerError::NicknameInUse(nick));
    }

    ctx.session.set_registered();
    info!(session = ctx.session.id(), nick = %nick, user = %user, "Client registered");

    ctx.send_reply(
        Response::RPL_WELCOME,
        vec![
            nick,
            format!("Welcome to the IRC Server {}", ctx.session.hostmask()),
        ],
    )
}
