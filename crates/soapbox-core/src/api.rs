//! Remote feature service client.
//!
//! [`ApiClient`] owns the blocking HTTP agent: JSON bodies, the global
//! transport timeout, error-body parsing, and a bounded retry budget for
//! transport-level failures. [`FeatureApi`] layers the feature-voting
//! operations on top and wraps failures in the user-facing message for the
//! attempted operation.
//!
//! The board consumes the [`FeatureService`] trait, never the concrete
//! client, so tests substitute an in-memory service.

#![allow(clippy::module_name_repetitions)]

use crate::config::ClientConfig;
use crate::model::{Feature, NewFeature};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

/// Transport-level error taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request exceeded the global transport timeout.
    #[error("Request timeout")]
    Timeout,

    /// The server answered with a non-2xx status. `message` is the parsed
    /// `error` body field, or `HTTP <status>: <reason>` when absent.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The request never produced a response (DNS, refused, reset...).
    #[error("network error: {0}")]
    Transport(String),

    /// The response body was not the JSON we expected.
    #[error("failed to decode API response: {0}")]
    Decode(String),
}

impl ApiError {
    /// True for failures that happened before any server response.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// An API failure wrapped in the user-facing message for the operation
/// that was being attempted.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
    #[source]
    pub source: ApiError,
}

impl ServiceError {
    #[must_use]
    pub fn new(message: impl Into<String>, source: ApiError) -> Self {
        Self {
            message: message.into(),
            source,
        }
    }
}

/// REST paths consumed by the client.
pub mod endpoints {
    pub const FEATURES: &str = "/api/features";
    pub const HEALTH: &str = "/api/health";

    #[must_use]
    pub fn feature(id: u64) -> String {
        format!("/api/features/{id}")
    }

    #[must_use]
    pub fn upvote(id: u64) -> String {
        format!("/api/features/{id}/upvote")
    }

    #[must_use]
    pub fn remove_vote(id: u64) -> String {
        format!("/api/features/{id}/remove-vote")
    }

    #[must_use]
    pub fn user_votes(user_id: &str) -> String {
        format!("/api/user/{user_id}/votes")
    }
}

/// Blocking JSON HTTP client with timeout and bounded transport retry.
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    retry_attempts: u32,
}

impl ApiClient {
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build();

        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_attempts: config.retry_attempts.max(1),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// GET `endpoint` and decode the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, timeout, non-2xx status,
    /// or an undecodable body.
    pub fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        let response = self.with_retry(endpoint, || {
            self.agent
                .get(&url)
                .set("Content-Type", "application/json")
                .call()
        })?;
        decode(response)
    }

    /// POST `body` as JSON and decode the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, timeout, non-2xx status,
    /// or an undecodable body.
    pub fn post_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        let response = self.with_retry(endpoint, || self.agent.post(&url).send_json(body))?;
        decode(response)
    }

    /// DELETE with a JSON request body, decoding the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, timeout, non-2xx status,
    /// or an undecodable body.
    pub fn delete_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint);
        let response = self.with_retry(endpoint, || self.agent.delete(&url).send_json(body))?;
        decode(response)
    }

    /// DELETE with no request body, ignoring whatever body comes back.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, timeout, or non-2xx
    /// status.
    pub fn delete(&self, endpoint: &str) -> Result<(), ApiError> {
        let url = self.url(endpoint);
        self.with_retry(endpoint, || {
            self.agent
                .delete(&url)
                .set("Content-Type", "application/json")
                .call()
        })?;
        Ok(())
    }

    /// Issue the request, retrying transport failures with exponential
    /// backoff up to the configured attempt budget.
    ///
    /// HTTP status errors and timeouts are not retried: the server has
    /// spoken in the first case, and a timed-out request already consumed
    /// the full timeout budget in the second.
    fn with_retry(
        &self,
        endpoint: &str,
        request: impl Fn() -> Result<ureq::Response, ureq::Error>,
    ) -> Result<ureq::Response, ApiError> {
        let mut attempt = 0;
        loop {
            match request() {
                Ok(response) => return Ok(response),
                Err(err) => {
                    let classified = classify(err);
                    attempt += 1;
                    if !classified.is_transport() || attempt >= self.retry_attempts {
                        return Err(classified);
                    }
                    let backoff = Duration::from_millis(100_u64 << (attempt - 1).min(6));
                    debug!(endpoint, attempt, backoff_ms = backoff.as_millis(),
                        error = %classified, "transport failure, retrying");
                    std::thread::sleep(backoff);
                }
            }
        }
    }
}

/// Map a raw transport error into the [`ApiError`] taxonomy.
fn classify(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(status, response) => {
            let reason = response.status_text().to_string();
            let message = response
                .into_string()
                .ok()
                .and_then(|body| serde_json::from_str::<serde_json::Value>(&body).ok())
                .and_then(|value| {
                    value
                        .get("error")
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| format!("HTTP {status}: {reason}"));
            ApiError::Status { status, message }
        }
        ureq::Error::Transport(transport) => {
            let text = transport.to_string();
            if looks_like_timeout(&text) {
                ApiError::Timeout
            } else {
                ApiError::Transport(text)
            }
        }
    }
}

fn looks_like_timeout(text: &str) -> bool {
    let lowered = text.to_ascii_lowercase();
    lowered.contains("timed out") || lowered.contains("timeout")
}

fn decode<T: DeserializeOwned>(response: ureq::Response) -> Result<T, ApiError> {
    response
        .into_json()
        .map_err(|err| ApiError::Decode(err.to_string()))
}

#[derive(serde::Serialize)]
struct VoteBody<'a> {
    user_id: &'a str,
}

/// The remote feature service surface the board depends on.
///
/// Every operation returns [`ServiceError`] carrying the user-facing
/// message for the attempted operation and the underlying [`ApiError`].
pub trait FeatureService {
    /// Fetch the full feature list.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the request fails.
    fn list(&self) -> Result<Vec<Feature>, ServiceError>;

    /// Submit a new feature and return the server's representation.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the request fails.
    fn create(&self, new: &NewFeature) -> Result<Feature, ServiceError>;

    /// Fetch one feature by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the request fails or the feature
    /// does not exist.
    fn get(&self, id: u64) -> Result<Feature, ServiceError>;

    /// Delete a feature by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the request fails.
    fn delete(&self, id: u64) -> Result<(), ServiceError>;

    /// Cast `user_id`'s vote and return the updated feature.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the request fails.
    fn upvote(&self, id: u64, user_id: &str) -> Result<Feature, ServiceError>;

    /// Retract `user_id`'s vote and return the updated feature.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the request fails.
    fn remove_vote(&self, id: u64, user_id: &str) -> Result<Feature, ServiceError>;

    /// Feature ids the server attributes to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the request fails.
    fn user_votes(&self, user_id: &str) -> Result<Vec<u64>, ServiceError>;

    /// Hit the health endpoint and return its raw JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the API is unreachable or unhealthy.
    fn health(&self) -> Result<serde_json::Value, ServiceError>;
}

/// [`FeatureService`] over HTTP via [`ApiClient`].
pub struct FeatureApi {
    client: ApiClient,
}

impl FeatureApi {
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: ApiClient::new(config),
        }
    }
}

impl FeatureService for FeatureApi {
    fn list(&self) -> Result<Vec<Feature>, ServiceError> {
        self.client
            .get_json(endpoints::FEATURES)
            .map_err(|err| op_failed("Failed to fetch features. Please try again.", "list", err))
    }

    fn create(&self, new: &NewFeature) -> Result<Feature, ServiceError> {
        self.client
            .post_json(endpoints::FEATURES, new)
            .map_err(|err| op_failed("Failed to create feature. Please try again.", "create", err))
    }

    fn get(&self, id: u64) -> Result<Feature, ServiceError> {
        self.client
            .get_json(&endpoints::feature(id))
            .map_err(|err| op_failed("Failed to fetch feature. Please try again.", "get", err))
    }

    fn delete(&self, id: u64) -> Result<(), ServiceError> {
        self.client
            .delete(&endpoints::feature(id))
            .map_err(|err| op_failed("Failed to delete feature. Please try again.", "delete", err))
    }

    fn upvote(&self, id: u64, user_id: &str) -> Result<Feature, ServiceError> {
        self.client
            .post_json(&endpoints::upvote(id), &VoteBody { user_id })
            .map_err(|err| op_failed("Failed to upvote feature. Please try again.", "upvote", err))
    }

    fn remove_vote(&self, id: u64, user_id: &str) -> Result<Feature, ServiceError> {
        self.client
            .delete_json(&endpoints::remove_vote(id), &VoteBody { user_id })
            .map_err(|err| {
                op_failed("Failed to remove vote. Please try again.", "remove_vote", err)
            })
    }

    fn user_votes(&self, user_id: &str) -> Result<Vec<u64>, ServiceError> {
        self.client
            .get_json(&endpoints::user_votes(user_id))
            .map_err(|err| {
                op_failed("Failed to fetch user votes. Please try again.", "user_votes", err)
            })
    }

    fn health(&self) -> Result<serde_json::Value, ServiceError> {
        self.client
            .get_json(endpoints::HEALTH)
            .map_err(|err| op_failed("API is not available. Please try again later.", "health", err))
    }
}

fn op_failed(message: &str, operation: &str, source: ApiError) -> ServiceError {
    error!(operation, error = %source, "API operation failed");
    ServiceError::new(message, source)
}
