//! The Matrix - Central shared state for the server.
//!
//! Holds the server identity and both registries. One instance is built at
//! startup and handed to every connection as `Arc<Matrix>`; tests build
//! their own.

use super::channels::ChannelRegistry;
use super::nicks::NickRegistry;
use super::session::Session;
use super::uid::{SessionId, UidGenerator};
use crate::config::Config;
use relay_proto::Message;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// This server's identity.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    /// Name used as the prefix of numeric replies.
    pub name: String,
}

/// The Matrix - Central shared state container.
#[derive(Debug)]
pub struct Matrix {
    /// This server's identity.
    pub server_info: ServerInfo,

    /// Connection password, if one is required.
    pub password: Option<String>,

    /// Folded nickname -> session.
    pub nicks: NickRegistry,

    /// Folded channel name -> channel.
    pub channels: ChannelRegistry,

    uid_gen: UidGenerator,
}

impl Matrix {
    /// Build the shared state from configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_server(&config.server.name, config.server.password.clone())
    }

    /// Build the shared state from a server name and optional password.
    ///
    /// An empty password means no password.
    pub fn with_server(name: &str, password: Option<String>) -> Self {
        Self {
            server_info: ServerInfo {
                name: name.to_string(),
            },
            password: password.filter(|p| !p.is_empty()),
            nicks: NickRegistry::new(),
            channels: ChannelRegistry::new(),
            uid_gen: UidGenerator::new(),
        }
    }

    /// Allocate an identifier for a new session.
    pub fn next_session_id(&self) -> SessionId {
        self.uid_gen.next()
    }

    /// Tear a session down.
    ///
    /// Closes the session, releases its nickname, tells each channel peer
    /// once that it quit, and detaches it from every channel. Only the
    /// first call for a session does anything; it returns `true`.
    pub fn disconnect(&self, session: &Session, reason: &str) -> bool {
        let registration = session.registration();
        let hostmask = session.hostmask();

        if !session.close() {
            debug!(session = session.id(), "Session already torn down");
            return false;
        }

        if let Some(nick) = registration.nick.as_deref()
            && registration.registered
        {
            self.nicks.unregister(nick, session);
        }

        let peers = self.channels.neighbors(session);
        let left = self.channels.detach_from_all(session);

        if registration.registered && !peers.is_empty() {
            let quit = Arc::new(Message::new("QUIT", vec![]).with_prefix(hostmask).with_trailing(reason));
            for peer in peers {
                if let Err(e) = peer.send(Arc::clone(&quit)) {
                    warn!(session = peer.id(), error = %e, "Failed to deliver QUIT notice");
                }
            }
        }

        info!(
            session = session.id(),
            nick = ?registration.nick,
            channels = left.len(),
            reason = %reason,
            "Client disconnected"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::session::test_support::{drain, session};

    fn registered(matrix: &Matrix, id: SessionId, nick: &str) -> (Arc<Session>, tokio::sync::mpsc::Receiver<Arc<Message>>) {
        let (s, rx) = session(id);
        s.set_nick(Some(nick.to_string()));
        s.set_user(nick.to_lowercase(), nick.to_string());
        matrix.nicks.register(nick, &s).unwrap();
        s.set_registered();
        (s, rx)
    }

    #[test]
    fn empty_password_means_none() {
        assert!(Matrix::with_server("irc.test", Some(String::new())).password.is_none());
        assert_eq!(
            Matrix::with_server("irc.test", Some("pw".into())).password.as_deref(),
            Some("pw")
        );
    }

    #[test]
    fn disconnect_is_idempotent() {
        let matrix = Matrix::with_server("irc.test", None);
        let (alice, _rx) = registered(&matrix, 1, "Alice");
        matrix.channels.join("#room", &alice).unwrap();

        assert!(matrix.disconnect(&alice, "gone"));
        assert!(!matrix.nicks.is_taken("alice"));
        assert!(!matrix.channels.exists("#room"));

        // A newcomer takes the nick; a second teardown must not touch it
        let (newcomer, _rx2) = registered(&matrix, 2, "Alice");
        matrix.channels.join("#room", &newcomer).unwrap();

        assert!(!matrix.disconnect(&alice, "gone again"));
        assert_eq!(matrix.nicks.lookup("alice").map(|s| s.id()), Some(2));
        assert!(matrix.channels.lookup("#room").is_some_and(|c| c.is_member(&newcomer)));
    }

    #[test]
    fn disconnect_notifies_each_peer_once() {
        let matrix = Matrix::with_server("irc.test", None);
        let (alice, _rx_a) = registered(&matrix, 1, "Alice");
        let (bob, mut rx_b) = registered(&matrix, 2, "Bob");
        for chan in ["#one", "#two"] {
            matrix.channels.join(chan, &alice).unwrap();
            matrix.channels.join(chan, &bob).unwrap();
        }

        matrix.disconnect(&alice, "Client Quit");

        assert_eq!(
            drain(&mut rx_b),
            vec![":Alice!alice@127.0.0.1 QUIT :Client Quit"]
        );
        let one = matrix.channels.lookup("#one").unwrap();
        assert!(one.is_operator(&bob));
    }

    #[test]
    fn disconnect_of_unregistered_session() {
        let matrix = Matrix::with_server("irc.test", None);
        let (s, _rx) = session(1);
        s.set_nick(Some("pending".into()));
        assert!(matrix.disconnect(&s, "EOF"));
        assert!(matrix.nicks.is_empty());
    }
}
