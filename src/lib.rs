//! relayd - a small multi-user IRC relay daemon.
//!
//! Clients register with `PASS`/`NICK`/`USER`, then talk in channels with
//! `JOIN`, `PART`, `PRIVMSG` and `KICK`. State lives in a [`state::Matrix`]
//! shared by every connection task; [`network::Gateway`] accepts sockets and
//! [`handlers::Registry`] routes each decoded line to its handler.

pub mod config;
pub mod error;
pub mod handlers;
pub mod network;
pub mod state;
pub mod telemetry;
