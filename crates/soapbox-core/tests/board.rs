//! Feature board behavior against a programmable in-memory service.
//!
//! Covers the synchronization rules: server-confirmed mutations only,
//! in-place replacement on votes, head insertion on create, untouched
//! state on failure, and vote-set bookkeeping through the session.

use chrono::Utc;
use soapbox_core::api::{ApiError, FeatureService, ServiceError};
use soapbox_core::board::{FeatureBoard, LoadPhase};
use soapbox_core::model::{Feature, NewFeature};
use soapbox_core::store::{KeyValueStore, MemoryStore, StoreError};
use soapbox_core::user::UserSession;
use std::cell::RefCell;

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// In-memory stand-in for the remote feature service.
#[derive(Default)]
struct FakeService {
    features: RefCell<Vec<Feature>>,
    next_id: RefCell<u64>,
    /// When set, the next operation fails with this error instead.
    fail_next: RefCell<Option<ServiceError>>,
}

impl FakeService {
    fn seeded(entries: &[(&str, u64)]) -> Self {
        let service = Self::default();
        for (title, upvotes) in entries {
            let id = service.assign_id();
            service.features.borrow_mut().push(Feature {
                id,
                title: (*title).to_string(),
                description: None,
                author: "seed".to_string(),
                upvotes: *upvotes,
                created_at: Utc::now(),
            });
        }
        service
    }

    fn assign_id(&self) -> u64 {
        let mut next = self.next_id.borrow_mut();
        *next += 1;
        *next
    }

    fn fail_next_with(&self, err: ServiceError) {
        *self.fail_next.borrow_mut() = Some(err);
    }

    fn take_failure(&self) -> Result<(), ServiceError> {
        match self.fail_next.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl FeatureService for &FakeService {
    fn list(&self) -> Result<Vec<Feature>, ServiceError> {
        self.take_failure()?;
        Ok(self.features.borrow().clone())
    }

    fn create(&self, new: &NewFeature) -> Result<Feature, ServiceError> {
        self.take_failure()?;
        let feature = Feature {
            id: self.assign_id(),
            title: new.title.clone(),
            description: new.description.clone(),
            author: new.author.clone(),
            upvotes: 0,
            created_at: Utc::now(),
        };
        self.features.borrow_mut().push(feature.clone());
        Ok(feature)
    }

    fn get(&self, id: u64) -> Result<Feature, ServiceError> {
        self.take_failure()?;
        self.features
            .borrow()
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    fn delete(&self, id: u64) -> Result<(), ServiceError> {
        self.take_failure()?;
        self.features.borrow_mut().retain(|f| f.id != id);
        Ok(())
    }

    fn upvote(&self, id: u64, _user_id: &str) -> Result<Feature, ServiceError> {
        self.take_failure()?;
        let mut features = self.features.borrow_mut();
        let feature = features
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| not_found(id))?;
        feature.upvotes += 1;
        Ok(feature.clone())
    }

    fn remove_vote(&self, id: u64, _user_id: &str) -> Result<Feature, ServiceError> {
        self.take_failure()?;
        let mut features = self.features.borrow_mut();
        let feature = features
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| not_found(id))?;
        feature.upvotes = feature.upvotes.saturating_sub(1);
        Ok(feature.clone())
    }

    fn user_votes(&self, _user_id: &str) -> Result<Vec<u64>, ServiceError> {
        self.take_failure()?;
        Ok(Vec::new())
    }

    fn health(&self) -> Result<serde_json::Value, ServiceError> {
        self.take_failure()?;
        Ok(serde_json::json!({ "status": "healthy" }))
    }
}

fn not_found(id: u64) -> ServiceError {
    ServiceError::new(
        "Failed to fetch feature. Please try again.",
        ApiError::Status {
            status: 404,
            message: format!("Feature {id} not found"),
        },
    )
}

fn timeout(message: &str) -> ServiceError {
    ServiceError::new(message, ApiError::Timeout)
}

/// Store whose writes always fail, for the absorb-on-failure posture.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }
}

fn board_over(service: &FakeService) -> FeatureBoard<&FakeService, MemoryStore> {
    FeatureBoard::new(service, UserSession::init(MemoryStore::new()))
}

// ---------------------------------------------------------------------------
// Fetch / refresh
// ---------------------------------------------------------------------------

#[test]
fn fetch_all_replaces_the_list() {
    let service = FakeService::seeded(&[("Dark mode", 2), ("Offline sync", 5)]);
    let mut board = board_over(&service);

    assert_eq!(board.phase(), LoadPhase::Idle);
    board.fetch_all().expect("fetch");
    assert_eq!(board.phase(), LoadPhase::Ready);
    assert_eq!(board.features().len(), 2);
}

#[test]
fn fetch_failure_leaves_prior_list_untouched() {
    let service = FakeService::seeded(&[("Dark mode", 2)]);
    let mut board = board_over(&service);
    board.fetch_all().expect("fetch");

    service.fail_next_with(timeout("Failed to fetch features. Please try again."));
    let err = board.fetch_all().expect_err("fetch should fail");

    assert_eq!(err.to_string(), "Failed to fetch features. Please try again.");
    assert_eq!(board.phase(), LoadPhase::Failed);
    assert_eq!(board.features().len(), 1);
    assert_eq!(board.features()[0].title, "Dark mode");
}

#[test]
fn refresh_has_fetch_semantics() {
    let service = FakeService::seeded(&[("Dark mode", 2)]);
    let mut board = board_over(&service);
    board.fetch_all().expect("fetch");

    (&service)
        .create(&NewFeature::new("Offline sync", "bob"))
        .expect("server-side create");
    board.refresh().expect("refresh");
    assert_eq!(board.features().len(), 2);
    assert_eq!(board.phase(), LoadPhase::Ready);
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_prepends_at_head_regardless_of_timestamps() {
    let service = FakeService::seeded(&[("Dark mode", 2), ("Offline sync", 5)]);
    let mut board = board_over(&service);
    board.fetch_all().expect("fetch");

    let created = board
        .create(&NewFeature::new("Export to CSV", "carol"))
        .expect("create")
        .clone();

    assert_eq!(created.upvotes, 0);
    assert_eq!(board.features()[0].id, created.id);
    assert_eq!(board.features().len(), 3);
}

#[test]
fn create_failure_leaves_list_unchanged() {
    let service = FakeService::seeded(&[("Dark mode", 2)]);
    let mut board = board_over(&service);
    board.fetch_all().expect("fetch");

    service.fail_next_with(timeout("Failed to create feature. Please try again."));
    let err = board
        .create(&NewFeature::new("Export to CSV", "carol"))
        .expect_err("create should fail");

    assert_eq!(err.to_string(), "Failed to create feature. Please try again.");
    assert_eq!(board.features().len(), 1);
}

// ---------------------------------------------------------------------------
// Votes
// ---------------------------------------------------------------------------

#[test]
fn upvote_replaces_in_place_and_records_the_vote() {
    // Scenario from the board contract: [A(2), B(5)], upvote A, server
    // returns A(3); result is [A(3), B(5)] and the vote is recorded.
    let service = FakeService::seeded(&[("A", 2), ("B", 5)]);
    let mut board = board_over(&service);
    board.fetch_all().expect("fetch");
    let a_id = board.features()[0].id;

    let updated = board.upvote(a_id).expect("upvote");

    assert_eq!(updated.upvotes, 3);
    assert_eq!(board.features()[0].id, a_id);
    assert_eq!(board.features()[0].upvotes, 3);
    assert_eq!(board.features()[1].upvotes, 5);
    assert!(board.session().has_voted(a_id));
}

#[test]
fn remove_vote_is_symmetric() {
    let service = FakeService::seeded(&[("A", 2)]);
    let mut board = board_over(&service);
    board.fetch_all().expect("fetch");
    let a_id = board.features()[0].id;

    board.upvote(a_id).expect("upvote");
    let updated = board.remove_vote(a_id).expect("remove vote");

    assert_eq!(updated.upvotes, 2);
    assert_eq!(board.features()[0].upvotes, 2);
    assert!(!board.session().has_voted(a_id));
}

#[test]
fn board_does_not_guard_against_double_upvote() {
    // The double-vote guard lives in the caller; a second upvote goes
    // through and the vote set simply records the id twice.
    let service = FakeService::seeded(&[("A", 2)]);
    let mut board = board_over(&service);
    board.fetch_all().expect("fetch");
    let a_id = board.features()[0].id;

    board.upvote(a_id).expect("first upvote");
    board.upvote(a_id).expect("second upvote");

    assert_eq!(board.features()[0].upvotes, 4);
    assert_eq!(board.session().votes(), &[a_id, a_id]);

    // remove_vote clears every occurrence.
    board.remove_vote(a_id).expect("remove vote");
    assert!(!board.session().has_voted(a_id));
}

#[test]
fn upvote_timeout_leaves_list_and_votes_unchanged() {
    let service = FakeService::seeded(&[("A", 2)]);
    let mut board = board_over(&service);
    board.fetch_all().expect("fetch");
    let a_id = board.features()[0].id;

    service.fail_next_with(timeout("Failed to upvote feature. Please try again."));
    let err = board.upvote(a_id).expect_err("upvote should fail");

    assert!(matches!(err.source, ApiError::Timeout));
    assert_eq!(err.source.to_string(), "Request timeout");
    assert_eq!(board.features()[0].upvotes, 2);
    assert!(!board.session().has_voted(a_id));
    assert!(board.session().votes().is_empty());
}

#[test]
fn timeout_and_server_errors_stay_distinguishable() {
    let service = FakeService::seeded(&[]);
    let mut board = board_over(&service);
    let missing = 999;

    let err = board.upvote(missing).expect_err("upvote should 404");
    match &err.source {
        ApiError::Status { status, message } => {
            assert_eq!(*status, 404);
            assert!(message.contains("999"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn vote_set_advances_in_memory_even_when_persistence_fails() {
    let service = FakeService::seeded(&[("A", 2)]);
    let session = UserSession::init(BrokenStore);
    let mut board = FeatureBoard::new(&service, session);
    board.fetch_all().expect("fetch");
    let a_id = board.features()[0].id;

    // The store rejects every write; the vote call still succeeds and the
    // in-memory set reflects it.
    let updated = board.upvote(a_id).expect("upvote succeeds despite storage");
    assert_eq!(updated.upvotes, 3);
    assert!(board.session().has_voted(a_id));

    board.remove_vote(a_id).expect("remove vote");
    assert!(!board.session().has_voted(a_id));
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_removes_entry_and_cascades_local_vote() {
    let service = FakeService::seeded(&[("A", 2), ("B", 5)]);
    let mut board = board_over(&service);
    board.fetch_all().expect("fetch");
    let a_id = board.features()[0].id;

    board.upvote(a_id).expect("upvote");
    board.delete(a_id).expect("delete");

    assert_eq!(board.features().len(), 1);
    assert_ne!(board.features()[0].id, a_id);
    assert!(!board.session().has_voted(a_id));
}

#[test]
fn delete_failure_leaves_everything_unchanged() {
    let service = FakeService::seeded(&[("A", 2)]);
    let mut board = board_over(&service);
    board.fetch_all().expect("fetch");
    let a_id = board.features()[0].id;
    board.upvote(a_id).expect("upvote");

    service.fail_next_with(timeout("Failed to delete feature. Please try again."));
    board.delete(a_id).expect_err("delete should fail");

    assert_eq!(board.features().len(), 1);
    assert!(board.session().has_voted(a_id));
}
