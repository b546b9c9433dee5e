use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A feature suggestion as the server represents it.
///
/// Every field is server-owned. The client never edits a `Feature` in
/// place; after a vote or create call it swaps in the representation the
/// server returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Server-assigned identifier.
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub author: String,
    /// Current vote count. Only the server mutates this.
    #[serde(default)]
    pub upvotes: u64,
    pub created_at: DateTime<Utc>,
}

/// The request body for submitting a new feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeature {
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewFeature {
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
