//! Channel command handlers.
//!
//! Handles JOIN, PART, KICK commands.

mod join;
mod kick;
mod part;

pub use join::JoinHandler;
pub use kick::KickHandler;
pub use part::PartHandler;
