//! Nickname registry.
//!
//! Maps folded nicknames to live sessions. Reads go straight to the
//! `DashMap`; every mutation runs under a single writer lock so
//! check-then-act sequences (claim, rename) are atomic.

use super::session::Session;
use crate::error::RegistryError;
use dashmap::DashMap;
use parking_lot::Mutex;
use relay_proto::irc_to_lower;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct NickRegistry {
    entries: DashMap<String, Arc<Session>>,
    write_lock: Mutex<()>,
}

impl NickRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_taken(&self, nick: &str) -> bool {
        self.entries.contains_key(&irc_to_lower(nick))
    }

    pub fn lookup(&self, nick: &str) -> Option<Arc<Session>> {
        self.entries
            .get(&irc_to_lower(nick))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Claim `nick` for `session`.
    pub fn register(&self, nick: &str, session: &Arc<Session>) -> Result<(), RegistryError> {
        let _guard = self.write_lock.lock();
        let key = irc_to_lower(nick);
        if self.entries.contains_key(&key) {
            return Err(RegistryError::NicknameInUse(nick.to_string()));
        }
        self.entries.insert(key, Arc::clone(session));
        Ok(())
    }

    /// Release `nick` if it is still held by `session`.
    ///
    /// Returns whether an entry was removed.
    pub fn unregister(&self, nick: &str, session: &Session) -> bool {
        let _guard = self.write_lock.lock();
        self.entries
            .remove_if(&irc_to_lower(nick), |_, owner| owner.id() == session.id())
            .is_some()
    }

    /// Move `session` from `old` to `new` in one step.
    ///
    /// A case-only change of the caller's own nick is allowed.
    pub fn rename(&self, old: &str, new: &str, session: &Arc<Session>) -> Result<(), RegistryError> {
        let _guard = self.write_lock.lock();
        let new_key = irc_to_lower(new);

        let taken = self
            .entries
            .get(&new_key)
            .is_some_and(|owner| owner.id() != session.id());
        if taken {
            return Err(RegistryError::NicknameInUse(new.to_string()));
        }

        self.entries
            .remove_if(&irc_to_lower(old), |_, owner| owner.id() == session.id());
        self.entries.insert(new_key, Arc::clone(session));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::session::test_support::session;

    #[test]
    fn uniqueness_is_case_insensitive() {
        let registry = NickRegistry::new();
        let (bob, _rx1) = session(1);
        let (other, _rx2) = session(2);

        registry.register("Bob", &bob).unwrap();
        assert_eq!(
            registry.register("BOB", &other),
            Err(RegistryError::NicknameInUse("BOB".into()))
        );
        registry.register("Alice", &other).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn folding_covers_brackets() {
        let registry = NickRegistry::new();
        let (a, _rx) = session(1);
        registry.register("x[1]", &a).unwrap();
        assert!(registry.is_taken("X{1}"));
        assert_eq!(registry.lookup("x{1}").map(|s| s.id()), Some(1));
    }

    #[test]
    fn unregister_requires_owner() {
        let registry = NickRegistry::new();
        let (a, _rx1) = session(1);
        let (b, _rx2) = session(2);
        registry.register("alice", &a).unwrap();

        assert!(!registry.unregister("alice", &b));
        assert!(registry.is_taken("alice"));
        assert!(registry.unregister("ALICE", &a));
        assert!(!registry.is_taken("alice"));
        assert!(registry.is_empty());
    }

    #[test]
    fn rename_moves_entry() {
        let registry = NickRegistry::new();
        let (a, _rx) = session(1);
        registry.register("alice", &a).unwrap();

        registry.rename("alice", "alicia", &a).unwrap();
        assert!(!registry.is_taken("alice"));
        assert_eq!(registry.lookup("ALICIA").map(|s| s.id()), Some(1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn rename_allows_case_change() {
        let registry = NickRegistry::new();
        let (a, _rx) = session(1);
        registry.register("alice", &a).unwrap();
        registry.rename("alice", "Alice", &a).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn rename_into_taken_fails_and_keeps_old() {
        let registry = NickRegistry::new();
        let (a, _rx1) = session(1);
        let (b, _rx2) = session(2);
        registry.register("alice", &a).unwrap();
        registry.register("bob", &b).unwrap();

        assert_eq!(
            registry.rename("alice", "BOB", &a),
            Err(RegistryError::NicknameInUse("BOB".into()))
        );
        assert_eq!(registry.lookup("alice").map(|s| s.id()), Some(1));
        assert_eq!(registry.lookup("bob").map(|s| s.id()), Some(2));
    }

    #[test]
    fn concurrent_claims_have_one_winner() {
        let registry = Arc::new(NickRegistry::new());
        let handles: Vec<_> = (1..=8)
            .map(|id| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let (s, _rx) = session(id);
                    registry.register("Racer", &s).is_ok()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
