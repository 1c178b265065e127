//! Per-connection state.
//!
//! A [`Session`] is created when a socket is accepted and shared (via
//! `Arc`) with the registries and every channel the client joins. The
//! owning connection task is the only writer of registration fields; other
//! tasks only read the nickname and push outbound messages.

use super::uid::SessionId;
use parking_lot::{Mutex, RwLock};
use relay_proto::Message;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::{self, error::TrySendError};

/// Registration fields of a session.
#[derive(Debug, Default, Clone)]
pub struct Registration {
    /// Nick provided by NICK (pending until registration completes).
    pub nick: Option<String>,
    /// Username provided by USER.
    pub user: Option<String>,
    /// Realname provided by USER.
    pub realname: Option<String>,
    /// Whether registration is complete.
    pub registered: bool,
    /// Password received via PASS.
    pub pass_attempt: Option<String>,
}

impl Registration {
    /// Check if we have both NICK and USER and can complete registration.
    pub fn can_register(&self) -> bool {
        self.nick.is_some() && self.user.is_some() && !self.registered
    }
}

/// A connected client.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    remote_host: String,
    state: RwLock<Registration>,
    closed: AtomicBool,
    outbound: Mutex<Option<mpsc::Sender<Arc<Message>>>>,
}

impl Session {
    /// Create a session writing into `outbound`.
    pub fn new(
        id: SessionId,
        remote_host: impl Into<String>,
        outbound: mpsc::Sender<Arc<Message>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            remote_host: remote_host.into(),
            state: RwLock::new(Registration::default()),
            closed: AtomicBool::new(false),
            outbound: Mutex::new(Some(outbound)),
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn remote_host(&self) -> &str {
        &self.remote_host
    }

    /// Snapshot of the registration fields.
    pub fn registration(&self) -> Registration {
        self.state.read().clone()
    }

    pub fn nick(&self) -> Option<String> {
        self.state.read().nick.clone()
    }

    /// Current nick, or `*` before one is set.
    pub fn nick_or_star(&self) -> String {
        self.nick().unwrap_or_else(|| "*".to_string())
    }

    pub fn is_registered(&self) -> bool {
        self.state.read().registered
    }

    pub fn set_nick(&self, nick: Option<String>) {
        self.state.write().nick = nick;
    }

    pub fn set_user(&self, user: String, realname: String) {
        let mut state = self.state.write();
        state.user = Some(user);
        state.realname = Some(realname);
    }

    pub fn set_pass_attempt(&self, password: String) {
        self.state.write().pass_attempt = Some(password);
    }

    pub fn set_registered(&self) {
        self.state.write().registered = true;
    }

    /// `nick!user@host`, falling back to the bare nick before USER.
    pub fn hostmask(&self) -> String {
        let state = self.state.read();
        let nick = state.nick.as_deref().unwrap_or("*");
        match state.user.as_deref() {
            Some(user) => format!("{}!{}@{}", nick, user, self.remote_host),
            None => nick.to_string(),
        }
    }

    /// Queue a message for this client without waiting.
    ///
    /// Fails once the session is closed or when the outbound queue is full.
    pub fn send(&self, msg: impl Into<Arc<Message>>) -> Result<(), TrySendError<Arc<Message>>> {
        let msg = msg.into();
        if self.is_closed() {
            return Err(TrySendError::Closed(msg));
        }
        match self.outbound.lock().as_ref() {
            Some(tx) => tx.try_send(msg),
            None => Err(TrySendError::Closed(msg)),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Mark the session closed and release the outbound queue.
    ///
    /// Returns `true` only for the call that actually closed it. Messages
    /// already queued are still flushed by the writer.
    pub fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.outbound.lock().take();
        true
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Session {}
