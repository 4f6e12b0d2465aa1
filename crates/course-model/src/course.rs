//! Course records as stored in the course table artifact.

use serde::{Deserialize, Serialize};

/// A single row of the course table.
///
/// The row position in the table is the course's index, which is also its
/// row and column in the similarity matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "course_name")]
    pub name: String,
    #[serde(rename = "course_url")]
    pub url: String,
}

impl Course {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A recommended course, in ranked order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub name: String,
    pub url: String,
    /// Similarity between the selected course and this one
    pub score: f64,
}
