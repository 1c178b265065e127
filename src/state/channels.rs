//! Channel registry.
//!
//! Maps folded channel names to channels. Creation, join and removal all
//! run under one writer lock, so a channel can never be garbage-collected
//! while another task is adding a member to it.

use super::channel::Channel;
use super::session::Session;
use crate::error::RegistryError;
use dashmap::DashMap;
use parking_lot::Mutex;
use relay_proto::channel_to_lower;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: DashMap<String, Arc<Channel>>,
    write_lock: Mutex<()>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry key for a raw channel name.
    pub fn resolve(raw: &str) -> String {
        channel_to_lower(raw)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.channels.contains_key(&Self::resolve(name))
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<Channel>> {
        self.channels
            .get(&Self::resolve(name))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Create a new, empty channel.
    pub fn create(&self, name: &str) -> Result<Arc<Channel>, RegistryError> {
        let _guard = self.write_lock.lock();
        self.create_locked(name)
    }

    /// Look `name` up, creating it on a miss.
    pub fn get_or_create(&self, name: &str) -> Result<Arc<Channel>, RegistryError> {
        let _guard = self.write_lock.lock();
        self.get_or_create_locked(name)
    }

    /// Get-or-create `name` and add `session` to it as one step.
    ///
    /// The flag is `false` when the session was already a member.
    pub fn join(
        &self,
        name: &str,
        session: &Arc<Session>,
    ) -> Result<(Arc<Channel>, bool), RegistryError> {
        let _guard = self.write_lock.lock();
        let channel = self.get_or_create_locked(name)?;
        let added = channel.add_member(session);
        Ok((channel, added))
    }

    /// Remove `session` from `channel`, dropping the channel if it empties.
    pub fn remove_member(&self, channel: &Arc<Channel>, session: &Session) -> bool {
        let _guard = self.write_lock.lock();
        let removed = channel.remove_member(session);
        self.collect_if_empty(channel);
        removed
    }

    /// Remove `session` from every channel it is in, in a single pass.
    ///
    /// Returns the channels it was detached from.
    pub fn detach_from_all(&self, session: &Session) -> Vec<Arc<Channel>> {
        let _guard = self.write_lock.lock();
        let joined: Vec<Arc<Channel>> = self
            .channels
            .iter()
            .filter(|entry| entry.value().is_member(session))
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for channel in &joined {
            channel.remove_member(session);
            self.collect_if_empty(channel);
        }
        joined
    }

    /// Channels `session` is currently a member of.
    pub fn channels_of(&self, session: &Session) -> Vec<Arc<Channel>> {
        self.channels
            .iter()
            .filter(|entry| entry.value().is_member(session))
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Every other session sharing at least one channel with `session`,
    /// each listed once.
    pub fn neighbors(&self, session: &Session) -> Vec<Arc<Session>> {
        let mut seen = HashSet::new();
        seen.insert(session.id());

        let mut peers = Vec::new();
        for channel in self.channels_of(session) {
            for member in channel.members() {
                if seen.insert(member.id()) {
                    peers.push(member);
                }
            }
        }
        peers
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    fn create_locked(&self, name: &str) -> Result<Arc<Channel>, RegistryError> {
        let display = if name.starts_with('#') {
            name.to_string()
        } else {
            format!("#{}", name)
        };
        let key = Self::resolve(name);

        if !Channel::is_valid_name(&key) {
            return Err(RegistryError::InvalidName(display));
        }
        if self.channels.contains_key(&key) {
            return Err(RegistryError::AlreadyExists(display));
        }

        let channel = Arc::new(Channel::new(display));
        self.channels.insert(key, Arc::clone(&channel));
        info!(channel = %channel.name(), "Channel created");
        Ok(channel)
    }

    fn get_or_create_locked(&self, name: &str) -> Result<Arc<Channel>, RegistryError> {
        match self.lookup(name) {
            Some(channel) => Ok(channel),
            None => self.create_locked(name),
        }
    }

    // Caller holds the writer lock.
    fn collect_if_empty(&self, channel: &Arc<Channel>) {
        if !channel.is_empty() {
            return;
        }
        let key = Self::resolve(channel.name());
        if self
            .channels
            .remove_if(&key, |_, existing| Arc::ptr_eq(existing, channel))
            .is_some()
        {
            info!(channel = %channel.name(), "Channel removed (empty)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::session::test_support::session;

    #[test]
    fn resolve_prepends_hash_and_lowercases() {
        assert_eq!(ChannelRegistry::resolve("General"), "#general");
        assert_eq!(ChannelRegistry::resolve("#RuSt"), "#rust");
    }

    #[test]
    fn create_keeps_display_case() {
        let registry = ChannelRegistry::new();
        let chan = registry.create("#General").unwrap();
        assert_eq!(chan.name(), "#General");
        assert!(registry.exists("#general"));
        assert!(registry.exists("GENERAL"));
    }

    #[test]
    fn create_forces_hash() {
        let registry = ChannelRegistry::new();
        let chan = registry.create("lobby").unwrap();
        assert_eq!(chan.name(), "#lobby");
    }

    #[test]
    fn create_rejects_duplicates_and_bad_names() {
        let registry = ChannelRegistry::new();
        registry.create("#dup").unwrap();
        assert_eq!(
            registry.create("#DUP").map(|_| ()),
            Err(RegistryError::AlreadyExists("#DUP".into()))
        );
        assert_eq!(
            registry.create("#bad name").map(|_| ()),
            Err(RegistryError::InvalidName("#bad name".into()))
        );
        assert_eq!(
            registry.create("#a#b").map(|_| ()),
            Err(RegistryError::InvalidName("#a#b".into()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_or_create_reuses() {
        let registry = ChannelRegistry::new();
        let a = registry.get_or_create("#x").unwrap();
        let b = registry.get_or_create("#X").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn emptied_channel_is_removed() {
        let registry = ChannelRegistry::new();
        let (a, _rx1) = session(1);
        let (b, _rx2) = session(2);

        let (chan, added) = registry.join("#room", &a).unwrap();
        assert!(added);
        registry.join("#room", &b).unwrap();

        assert!(registry.remove_member(&chan, &a));
        assert!(registry.exists("#room"));
        assert!(registry.remove_member(&chan, &b));
        assert!(!registry.exists("#room"));
        assert!(registry.is_empty());
    }

    #[test]
    fn rejoin_is_reported() {
        let registry = ChannelRegistry::new();
        let (a, _rx) = session(1);
        registry.join("#room", &a).unwrap();
        let (_, added) = registry.join("#ROOM", &a).unwrap();
        assert!(!added);
    }

    #[test]
    fn detach_from_all_collects_empties() {
        let registry = ChannelRegistry::new();
        let (a, _rx1) = session(1);
        let (b, _rx2) = session(2);
        registry.join("#solo", &a).unwrap();
        registry.join("#shared", &a).unwrap();
        registry.join("#shared", &b).unwrap();

        let left = registry.detach_from_all(&a);
        assert_eq!(left.len(), 2);
        assert!(!registry.exists("#solo"));
        let shared = registry.lookup("#shared").unwrap();
        assert!(!shared.is_member(&a));
        assert!(shared.is_operator(&b));

        // Second pass finds nothing
        assert!(registry.detach_from_all(&a).is_empty());
    }

    #[test]
    fn neighbors_are_distinct() {
        let registry = ChannelRegistry::new();
        let (a, _rx1) = session(1);
        let (b, _rx2) = session(2);
        let (c, _rx3) = session(3);
        registry.join("#one", &a).unwrap();
        registry.join("#two", &a).unwrap();
        registry.join("#one", &b).unwrap();
        registry.join("#two", &b).unwrap();
        registry.join("#two", &c).unwrap();

        let mut ids: Vec<_> = registry.neighbors(&a).iter().map(|s| s.id()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn concurrent_join_and_leave_never_lose_a_member() {
        let registry = Arc::new(ChannelRegistry::new());
        let (anchor, _rx) = session(0);

        let handles: Vec<_> = (1..=8u64)
            .map(|id| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let (s, _rx) = session(id);
                    for _ in 0..200 {
                        let (chan, _) = registry.join("#churn", &s).unwrap();
                        registry.remove_member(&chan, &s);
                    }
                })
            })
            .collect();

        registry.join("#churn", &anchor).unwrap();
        for h in handles {
            h.join().unwrap();
        }

        // anchor joined at some point and never left: the channel must still hold it
        let chan = registry.lookup("#churn").expect("channel with a member survives");
        assert!(chan.is_member(&anchor));
        assert_eq!(chan.len(), 1);
        assert!(chan.is_operator(&anchor));
    }
}
