//! In-memory registry of live review sessions.
//!
//! Sessions are keyed by a random ID handed to the client and expire after
//! a configurable duration of inactivity.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config;
use crate::db::SqliteStore;
use crate::review::ReviewSession;

/// A session shared between requests. Each request locks it for the length
/// of one operation.
pub type Shared<T> = Arc<Mutex<T>>;

/// Registry of review sessions over the application database
pub type ReviewSessions = SessionRegistry<ReviewSession<SqliteStore>>;

/// Session entry with last access time for expiration
struct SessionEntry<T> {
  session: Shared<T>,
  last_access: DateTime<Utc>,
}

pub struct SessionRegistry<T> {
  sessions: Arc<Mutex<HashMap<String, SessionEntry<T>>>>,
}

impl<T> Clone for SessionRegistry<T> {
  fn clone(&self) -> Self {
    Self {
      sessions: Arc::clone(&self.sessions),
    }
  }
}

impl<T> Default for SessionRegistry<T> {
  fn default() -> Self {
    Self {
      sessions: Arc::new(Mutex::new(HashMap::new())),
    }
  }
}

impl<T> SessionRegistry<T> {
  pub fn new() -> Self {
    Self::default()
  }

  // A panic mid-request leaves the map itself intact
  fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry<T>>> {
    self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Register a session under a fresh ID
  pub fn insert(&self, session: T) -> String {
    let session_id = generate_session_id();
    let mut sessions = self.lock();
    sessions.insert(
      session_id.clone(),
      SessionEntry {
        session: Arc::new(Mutex::new(session)),
        last_access: Utc::now(),
      },
    );
    session_id
  }

  /// Look up a session, refreshing its expiry
  pub fn get(&self, session_id: &str) -> Option<Shared<T>> {
    let mut sessions = self.lock();

    // Clean up expired sessions occasionally (~10% chance)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      cleanup_expired(&mut sessions);
    }

    let entry = sessions.get_mut(session_id)?;
    entry.last_access = Utc::now();
    Some(Arc::clone(&entry.session))
  }

  pub fn remove(&self, session_id: &str) -> bool {
    self.lock().remove(session_id).is_some()
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Clean up expired sessions
fn cleanup_expired<T>(sessions: &mut HashMap<String, SessionEntry<T>>) {
  let expiry = Utc::now() - Duration::hours(config::SESSION_EXPIRY_HOURS);
  let before = sessions.len();
  sessions.retain(|_, entry| entry.last_access > expiry);
  if sessions.len() < before {
    tracing::debug!("Expired {} review sessions", before - sessions.len());
  }
}

/// Lock a shared session, recovering it if a previous holder panicked
pub fn lock_session<T>(session: &Shared<T>) -> MutexGuard<'_, T> {
  session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_insert_and_get() {
    let registry = SessionRegistry::new();
    let id = registry.insert(7u32);

    let session = registry.get(&id).unwrap();
    *lock_session(&session) += 1;
    assert_eq!(*lock_session(&registry.get(&id).unwrap()), 8);
    assert!(registry.get("missing").is_none());
  }

  #[test]
  fn test_remove() {
    let registry = SessionRegistry::new();
    let id = registry.insert("s");
    assert!(registry.remove(&id));
    assert!(!registry.remove(&id));
    assert!(registry.is_empty());
  }

  #[test]
  fn test_cleanup_drops_only_expired() {
    let registry = SessionRegistry::new();
    let stale = registry.insert(1u8);
    let fresh = registry.insert(2u8);

    {
      let mut sessions = registry.lock();
      if let Some(entry) = sessions.get_mut(&stale) {
        entry.last_access = Utc::now() - Duration::hours(config::SESSION_EXPIRY_HOURS + 1);
      }
      cleanup_expired(&mut sessions);
    }

    assert_eq!(registry.len(), 1);
    assert!(registry.get(&fresh).is_some());
  }

  #[test]
  fn test_session_id_format() {
    let id = generate_session_id();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_ne!(id, generate_session_id());
  }
}
