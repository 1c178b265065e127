//! State management module.
//!
//! Contains the Matrix (shared server state), the two registries, and the
//! per-connection session.

mod channel;
mod channels;
mod matrix;
mod nicks;
mod session;
mod uid;

pub use channel::Channel;
pub use channels::ChannelRegistry;
pub use matrix::{Matrix, ServerInfo};
pub use nicks::NickRegistry;
pub use session::{Registration, Session};
pub use uid::{SessionId, UidGenerator};
