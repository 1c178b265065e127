//! Command handlers.
//!
//! This module contains the Handler trait and command registry for
//! dispatching incoming messages to the appropriate handlers.
//!
//! Handlers report failures as [`HandlerError`](crate::error::HandlerError);
//! the registry turns each into its numeric reply.

mod channel;
mod connection;
mod core;
mod helpers;
mod messaging;


pub use self::core::{Context, Handler, Phase, Registry};
pub use channel::{JoinHandler, KickHandler, PartHandler};
pub use connection::{NickHandler, PassHandler, QuitHandler, UserHandler, try_complete_registration};
pub use helpers::{names_replies, server_reply};
pub use messaging::PrivmsgHandler;
