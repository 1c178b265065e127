//! Command dispatch.
//!
//! Routing is a total match over [`Command`]: every supported command maps
//! to one handler and the registration phase it requires; anything else is
//! answered with 421 and leaves state untouched.

use super::context::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{
    channel::{JoinHandler, KickHandler, PartHandler},
    connection::{NickHandler, PassHandler, QuitHandler, UserHandler},
    messaging::PrivmsgHandler,
};
use crate::telemetry::{CommandTimer, spans};
use relay_proto::{Command, Message};
use tracing::{Instrument, debug};

/// Registration state a command needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Accepted before and after registration.
    Any,
    /// Rejected with 451 until registration completes.
    Registered,
}

/// Routes decoded messages to their handlers.
#[derive(Debug, Default)]
pub struct Registry;

impl Registry {
    pub fn new() -> Self {
        Self
    }

    /// Handler and phase for a command, `None` when unsupported.
    pub fn route(command: &Command) -> Option<(&'static dyn Handler, Phase)> {
        let route: (&'static dyn Handler, Phase) = match command {
            Command::PASS => (&PassHandler, Phase::Any),
            Command::NICK => (&NickHandler, Phase::Any),
            Command::USER => (&UserHandler, Phase::Any),
            Command::QUIT => (&QuitHandler, Phase::Any),
            Command::PART => (&PartHandler, Phase::Any),
            Command::PRIVMSG => (&PrivmsgHandler, Phase::Any),
            Command::JOIN => (&JoinHandler, Phase::Registered),
            Command::KICK => (&KickHandler, Phase::Registered),
            Command::Unknown(_) => return None,
        };
        Some(route)
    }

    /// Dispatch a message to the appropriate handler.
    ///
    /// Non-fatal handler errors are answered with their numeric reply and
    /// swallowed. Only errors that end the connection (quit, bad password,
    /// own queue failure) are returned.
    pub async fn dispatch(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let command = msg.kind();

        let result = match Self::route(&command) {
            Some((_, Phase::Registered)) if !ctx.session.is_registered() => {
                Err(HandlerError::NotRegistered)
            }
            Some((handler, _)) => {
                let span = spans::command(
                    command.as_str(),
                    &ctx.session.nick_or_star(),
                    ctx.session.id(),
                );
                let _timer = CommandTimer::new(command.as_str());
                handler.handle(ctx, msg).instrument(span).await
            }
            None => Err(HandlerError::UnknownCommand(msg.command.clone())),
        };

        let Err(err) = result else {
            return Ok(());
        };

        debug!(command = %command, code = err.error_code(), error = %err, "Command error");

        if let Some(reply) = err.to_irc_reply(ctx.server_name(), &ctx.session.nick_or_star()) {
            ctx.send(reply)?;
        }

        if err.is_fatal() { Err(err) } else { Ok(()) }
    }
}
