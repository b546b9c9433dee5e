//! The feature board: the client-side canonical copy of the feature list.
//!
//! The board owns an ordered in-memory list (newest first), drives every
//! remote operation through its injected [`FeatureService`], and delegates
//! vote bookkeeping to the injected [`UserSession`]. Local mutations are
//! applied only after the server confirms, using the server-returned
//! representation; on any failure the list is left exactly as it was.

#![allow(clippy::module_name_repetitions)]

use crate::api::{FeatureService, ServiceError};
use crate::model::{Feature, NewFeature};
use crate::store::KeyValueStore;
use crate::user::UserSession;
use tracing::info;

/// Where the board is in its load lifecycle, so the presentation layer can
/// distinguish an initial load from a pull-to-refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Refreshing,
    Ready,
    Failed,
}

/// In-memory feature list synchronized against the remote service.
pub struct FeatureBoard<F: FeatureService, S: KeyValueStore> {
    service: F,
    session: UserSession<S>,
    features: Vec<Feature>,
    phase: LoadPhase,
}

impl<F: FeatureService, S: KeyValueStore> FeatureBoard<F, S> {
    #[must_use]
    pub const fn new(service: F, session: UserSession<S>) -> Self {
        Self {
            service,
            session,
            features: Vec::new(),
            phase: LoadPhase::Idle,
        }
    }

    /// The current client-side copy of the list, newest first.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    #[must_use]
    pub const fn phase(&self) -> LoadPhase {
        self.phase
    }

    #[must_use]
    pub const fn session(&self) -> &UserSession<S> {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut UserSession<S> {
        &mut self.session
    }

    /// Replace the whole list with the server's current list.
    ///
    /// On failure the prior list is untouched and the error propagates;
    /// there is no automatic retry at this layer.
    ///
    /// # Errors
    ///
    /// Returns the service's [`ServiceError`] unchanged.
    pub fn fetch_all(&mut self) -> Result<(), ServiceError> {
        self.phase = LoadPhase::Loading;
        self.sync()
    }

    /// Same as [`fetch_all`](Self::fetch_all), but signals a refresh so
    /// the presentation layer can render it differently.
    ///
    /// # Errors
    ///
    /// Returns the service's [`ServiceError`] unchanged.
    pub fn refresh(&mut self) -> Result<(), ServiceError> {
        self.phase = LoadPhase::Refreshing;
        self.sync()
    }

    fn sync(&mut self) -> Result<(), ServiceError> {
        match self.service.list() {
            Ok(list) => {
                self.features = list;
                self.phase = LoadPhase::Ready;
                Ok(())
            }
            Err(err) => {
                self.phase = LoadPhase::Failed;
                Err(err)
            }
        }
    }

    /// Submit a new feature; on success the server-returned feature is
    /// prepended at the head of the list regardless of timestamp order.
    ///
    /// No optimistic insert happens before the server confirms.
    ///
    /// # Errors
    ///
    /// Returns the service's [`ServiceError`]; the list is unchanged.
    pub fn create(&mut self, new: &NewFeature) -> Result<&Feature, ServiceError> {
        let created = self.service.create(new)?;
        info!(id = created.id, "feature created");
        self.features.insert(0, created);
        Ok(&self.features[0])
    }

    /// Cast this user's vote for `feature_id`.
    ///
    /// On success the matching list entry is replaced in place (position
    /// preserved) with the server-returned feature, and only then is the
    /// vote recorded in the session. The session persists its snapshot
    /// with the absorb-on-failure posture, so a storage failure here still
    /// returns success for the vote itself — the persisted vote set may
    /// lag until the next mutation.
    ///
    /// This layer does not reject a second upvote for an already-voted
    /// feature; the caller guards by consulting
    /// [`UserSession::has_voted`].
    ///
    /// # Errors
    ///
    /// Returns the service's [`ServiceError`]; neither the list nor the
    /// vote set changes.
    pub fn upvote(&mut self, feature_id: u64) -> Result<Feature, ServiceError> {
        let updated = self.service.upvote(feature_id, self.session.user_id())?;
        self.replace_in_place(&updated);
        self.session.add_vote(feature_id);
        Ok(updated)
    }

    /// Retract this user's vote for `feature_id`. Symmetric to
    /// [`upvote`](Self::upvote).
    ///
    /// # Errors
    ///
    /// Returns the service's [`ServiceError`]; neither the list nor the
    /// vote set changes.
    pub fn remove_vote(&mut self, feature_id: u64) -> Result<Feature, ServiceError> {
        let updated = self.service.remove_vote(feature_id, self.session.user_id())?;
        self.replace_in_place(&updated);
        self.session.remove_vote(feature_id);
        Ok(updated)
    }

    /// Delete a feature; on success the entry is removed from the list and
    /// its id is cleared from the local vote set so no orphaned vote
    /// reference survives the feature it pointed at.
    ///
    /// # Errors
    ///
    /// Returns the service's [`ServiceError`]; the entry and any local
    /// vote stay in place.
    pub fn delete(&mut self, feature_id: u64) -> Result<(), ServiceError> {
        self.service.delete(feature_id)?;
        self.features.retain(|feature| feature.id != feature_id);
        if self.session.has_voted(feature_id) {
            self.session.remove_vote(feature_id);
        }
        Ok(())
    }

    fn replace_in_place(&mut self, updated: &Feature) {
        if let Some(slot) = self
            .features
            .iter_mut()
            .find(|feature| feature.id == updated.id)
        {
            *slot = updated.clone();
        }
    }
}
