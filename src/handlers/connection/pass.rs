//! PASS command handler for connection registration.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};
use async_trait::async_trait;
use relay_proto::Message;
use tracing::debug;

/// Handler for PASS command.
///
/// `PASS <password>`
///
/// Stores the attempted credential; it is checked once NICK and USER are
/// both known.
pub struct PassHandler;

#[async_trait]
impl Handler for PassHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        if ctx.session.is_registered() {
            return Err(HandlerError::AlreadyRegistered);
        }

        let password = msg
            .arg(0)
            .filter(|p| !p.is_empty())
            .ok_or(HandlerError::NeedMoreParams("PASS"))?;
        ctx.session.set_pass_attempt(password.to_string());
        debug!("PASS received");

        Ok(())
    }
}
