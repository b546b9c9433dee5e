//! The anonymous user session: identity plus the local vote set.
//!
//! A [`UserSession`] is constructed explicitly and injected into the
//! feature board — there is no process-global user state. Construction
//! loads the persisted identifier and vote snapshot, generating and
//! persisting a fresh identifier on first launch.
//!
//! Persistence failures are logged and absorbed: voting must not block on
//! storage, so in-memory state always advances and the snapshot is simply
//! retried at the next mutation.

#![allow(clippy::module_name_repetitions)]

use crate::store::{KeyValueStore, USER_ID_KEY, USER_VOTES_KEY};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Identity and vote bookkeeping for the local user.
#[derive(Debug)]
pub struct UserSession<S: KeyValueStore> {
    store: S,
    user_id: String,
    votes: Vec<u64>,
}

impl<S: KeyValueStore> UserSession<S> {
    /// Load the session from the store, generating a fresh identity on
    /// first launch.
    ///
    /// A storage read failure falls back to a memory-only identifier and
    /// an empty vote set rather than failing the caller.
    pub fn init(store: S) -> Self {
        let user_id = match store.get(USER_ID_KEY) {
            Ok(Some(id)) if !id.is_empty() => id,
            Ok(_) => {
                let id = generate_user_id();
                if let Err(err) = store.set(USER_ID_KEY, &id) {
                    warn!(error = %err, "failed to persist generated user id");
                }
                id
            }
            Err(err) => {
                warn!(error = %err, "failed to read user id, using memory-only identity");
                generate_user_id()
            }
        };

        let votes = match store.get(USER_VOTES_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(error = %err, "corrupt vote snapshot, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to read vote snapshot, starting empty");
                Vec::new()
            }
        };

        Self {
            store,
            user_id,
            votes,
        }
    }

    /// The stable anonymous identifier for this installation.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Feature ids the local user has voted for, in vote order.
    #[must_use]
    pub fn votes(&self) -> &[u64] {
        &self.votes
    }

    /// Pure membership check against the in-memory vote set.
    #[must_use]
    pub fn has_voted(&self, feature_id: u64) -> bool {
        self.votes.contains(&feature_id)
    }

    /// Record a vote and persist the updated snapshot.
    ///
    /// This layer does not deduplicate; callers guard against double-adding
    /// by consulting [`has_voted`](Self::has_voted) first.
    pub fn add_vote(&mut self, feature_id: u64) {
        self.votes.push(feature_id);
        self.persist_votes();
    }

    /// Remove every occurrence of `feature_id` and persist the snapshot.
    pub fn remove_vote(&mut self, feature_id: u64) {
        self.votes.retain(|id| *id != feature_id);
        self.persist_votes();
    }

    /// Wipe identity and vote set, in memory and in the store.
    ///
    /// The session keeps a fresh memory-only identifier so it stays
    /// usable; the next [`init`](Self::init) generates and persists a new
    /// one.
    pub fn clear_user_data(&mut self) {
        self.votes.clear();
        for key in [USER_ID_KEY, USER_VOTES_KEY] {
            if let Err(err) = self.store.remove(key) {
                warn!(key, error = %err, "failed to clear persisted user data");
            }
        }
        self.user_id = generate_user_id();
    }

    fn persist_votes(&self) {
        match serde_json::to_string(&self.votes) {
            Ok(snapshot) => {
                if let Err(err) = self.store.set(USER_VOTES_KEY, &snapshot) {
                    warn!(error = %err, "failed to persist vote snapshot");
                }
            }
            Err(err) => warn!(error = %err, "failed to encode vote snapshot"),
        }
    }
}

/// Generate a new anonymous identifier: `user_<millis>_<random>`.
fn generate_user_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis());
    let suffix: u32 = rand::random();
    format!("user_{millis}_{suffix:08x}")
}
