//! Submission validation for new features.
//!
//! Pure and stateless. Each field runs an ordered short-circuit chain
//! (required, then minimum length, then maximum length) and keeps only the
//! first failing message, so a blank title reports "Title is required"
//! rather than a length complaint.

#![allow(clippy::module_name_repetitions)]

use crate::model::NewFeature;
use serde::Serialize;

pub const TITLE_MIN_LEN: usize = 3;
pub const TITLE_MAX_LEN: usize = 200;
pub const AUTHOR_MIN_LEN: usize = 2;
pub const AUTHOR_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// Per-field first-failure messages for a submitted feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ValidationReport {
    /// True iff no field produced an error.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.description.is_none()
    }

    /// All failing messages in field order, for flat rendering.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        [&self.title, &self.author, &self.description]
            .into_iter()
            .filter_map(|m| m.as_deref())
            .collect()
    }
}

/// Validate a feature submission before it is sent to the API.
#[must_use]
pub fn validate_feature(data: &NewFeature) -> ValidationReport {
    let title = required(&data.title, "Title")
        .or_else(|| min_length(&data.title, TITLE_MIN_LEN, "Title"))
        .or_else(|| max_length(&data.title, TITLE_MAX_LEN, "Title"));

    let author = required(&data.author, "Author")
        .or_else(|| min_length(&data.author, AUTHOR_MIN_LEN, "Author"))
        .or_else(|| max_length(&data.author, AUTHOR_MAX_LEN, "Author"));

    // Description is optional: only length-checked when present and non-empty.
    let description = data
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .and_then(|d| max_length(d, DESCRIPTION_MAX_LEN, "Description"));

    ValidationReport {
        title,
        author,
        description,
    }
}

fn required(value: &str, field: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some(format!("{field} is required"))
    } else {
        None
    }
}

fn min_length(value: &str, min: usize, field: &str) -> Option<String> {
    if value.chars().count() < min {
        Some(format!("{field} must be at least {min} characters"))
    } else {
        None
    }
}

fn max_length(value: &str, max: usize, field: &str) -> Option<String> {
    if value.chars().count() > max {
        Some(format!("{field} must be no more than {max} characters"))
    } else {
        None
    }
}
