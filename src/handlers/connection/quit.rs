//! QUIT handler for terminating client sessions.

use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handler};
use async_trait::async_trait;
use relay_proto::Message;
use tracing::info;

/// Reason used when QUIT carries none.
pub const DEFAULT_QUIT_REASON: &str = "Client Quit";

/// Handler for QUIT command.
pub struct QuitHandler;

#[async_trait]
impl Handler for QuitHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let reason = msg.arg(0).unwrap_or(DEFAULT_QUIT_REASON).to_string();

        info!(
            session = ctx.session.id(),
            nick = ?ctx.session.nick(),
            reason = %reason,
            "Client quit"
        );

        // The connection loop sends the closing ERROR and tears down
        Err(HandlerError::Quit(reason))
    }
}
