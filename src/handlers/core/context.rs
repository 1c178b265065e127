//! Command handler context and the handler trait.

use crate::error::HandlerResult;
use crate::handlers::helpers::server_reply;
use crate::state::{Matrix, Session};
use async_trait::async_trait;
use relay_proto::{Message, Response};
use std::sync::Arc;

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// The session that sent the command.
    pub session: &'a Arc<Session>,
    /// Shared server state.
    pub matrix: &'a Arc<Matrix>,
}

impl<'a> Context<'a> {
    pub fn new(session: &'a Arc<Session>, matrix: &'a Arc<Matrix>) -> Self {
        Self { session, matrix }
    }

    pub fn server_name(&self) -> &str {
        &self.matrix.server_info.name
    }

    /// Queue a message for the sender of the command.
    #[inline]
    pub fn send(&self, msg: impl Into<Arc<Message>>) -> HandlerResult {
        self.session.send(msg)?;
        Ok(())
    }

    /// Build and send a server reply in one call.
    #[inline]
    pub fn send_reply(&self, response: Response, params: Vec<String>) -> HandlerResult {
        self.send(server_reply(self.server_name(), response, params))
    }
}

/// A command handler.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult;
}
