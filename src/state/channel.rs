//! A single channel: ordered membership, operators, and broadcast.

use super::session::Session;
use super::uid::SessionId;
use parking_lot::Mutex;
use relay_proto::{ChannelExt, Message};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct Membership {
    /// Insertion order; the front is the oldest member.
    members: Vec<Arc<Session>>,
    /// Always a subset of `members`, non-empty whenever `members` is.
    operators: HashSet<SessionId>,
}

/// A named group of sessions.
#[derive(Debug)]
pub struct Channel {
    name: String,
    inner: Mutex<Membership>,
}

impl Channel {
    /// Create an empty channel with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: Mutex::new(Membership::default()),
        }
    }

    /// Display name, with the caller's original casing.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_valid_name(name: &str) -> bool {
        name.is_valid_channel_name()
    }

    /// Add `session`; the first member of an empty channel becomes operator.
    ///
    /// Returns `false` if it was already a member.
    pub fn add_member(&self, session: &Arc<Session>) -> bool {
        let mut inner = self.inner.lock();
        if inner.members.iter().any(|m| m.id() == session.id()) {
            return false;
        }
        if inner.members.is_empty() {
            inner.operators.insert(session.id());
        }
        inner.members.push(Arc::clone(session));
        true
    }

    /// Remove `session`, promoting the oldest remaining member if no
    /// operator is left.
    ///
    /// Returns `false` if it was not a member.
    pub fn remove_member(&self, session: &Session) -> bool {
        let mut inner = self.inner.lock();
        let Some(pos) = inner.members.iter().position(|m| m.id() == session.id()) else {
            return false;
        };
        inner.members.remove(pos);
        inner.operators.remove(&session.id());

        if inner.operators.is_empty()
            && let Some(oldest) = inner.members.first()
        {
            let (id, nick) = (oldest.id(), oldest.nick_or_star());
            inner.operators.insert(id);
            info!(channel = %self.name, nick = %nick, "Operator auto-promoted");
        }
        true
    }

    pub fn is_member(&self, session: &Session) -> bool {
        self.inner
            .lock()
            .members
            .iter()
            .any(|m| m.id() == session.id())
    }

    pub fn is_operator(&self, session: &Session) -> bool {
        self.inner.lock().operators.contains(&session.id())
    }

    /// Snapshot of the members in insertion order.
    pub fn members(&self) -> Vec<Arc<Session>> {
        self.inner.lock().members.clone()
    }

    /// Find a member by nickname.
    pub fn member_by_nick(&self, nick: &str) -> Option<Arc<Session>> {
        self.inner
            .lock()
            .members
            .iter()
            .find(|m| m.nick().is_some_and(|n| relay_proto::irc_eq(&n, nick)))
            .cloned()
    }

    /// Member nicks in insertion order, operators prefixed with `@`.
    pub fn names(&self) -> Vec<String> {
        let inner = self.inner.lock();
        inner
            .members
            .iter()
            .map(|m| {
                let nick = m.nick_or_star();
                if inner.operators.contains(&m.id()) {
                    format!("@{}", nick)
                } else {
                    nick
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().members.is_empty()
    }

    /// Deliver `msg` to every member except `skip`, in membership order.
    ///
    /// Returns the number of members the message was queued for.
    pub fn broadcast(&self, msg: &Arc<Message>, skip: Option<&Session>) -> usize {
        let recipients: Vec<Arc<Session>> = self
            .members()
            .into_iter()
            .filter(|member| skip.is_none_or(|s| s.id() != member.id()))
            .collect();
        self.deliver(&recipients, msg)
    }

    /// Deliver `msg` to a membership snapshot taken earlier.
    ///
    /// Sends happen outside the lock; a failing recipient is logged and
    /// skipped. Lets a notice reach members removed since the snapshot.
    pub fn deliver(&self, recipients: &[Arc<Session>], msg: &Arc<Message>) -> usize {
        let mut delivered = 0;

        for member in recipients {
            match member.send(Arc::clone(msg)) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(channel = %self.name, session = member.id(), "Outbound queue full, dropping message");
                }
                Err(TrySendError::Closed(_)) => {
                    warn!(channel = %self.name, session = member.id(), "Member connection closed, skipping");
                }
            }
        }

        delivered
    }
}
