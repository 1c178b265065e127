//! USER command handler for connection registration.

use super::welcome::try_complete_registration;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};
use async_trait::async_trait;
use relay_proto::Message;

/// Handler for USER command.
///
/// `USER <username> <mode> <unused> <realname>`
pub struct UserHandler;

#[async_trait]
impl Handler for UserHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        if ctx.session.is_registered() {
            return Err(HandlerError::AlreadyRegistered);
        }

        let [username, _, _, realname, ..] = msg.params.as_slice() else {
            return Err(HandlerError::NeedMoreParams("USER"));
        };

        ctx.session.set_user(username.clone(), realname.clone());
        try_complete_registration(ctx)
    }
}
