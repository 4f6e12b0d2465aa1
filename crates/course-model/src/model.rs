//! The loaded, validated recommendation model.
//!
//! A [`CourseModel`] owns the course table, the similarity matrix and the
//! display name list. It is built once and never mutated, so it can be shared
//! across request handlers behind an `Arc` without locking.

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::artifacts::{ArtifactKind, DecodeError};
use crate::course::Course;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("The {artifact} artifact is missing (expected at {})", .path.display())]
    ArtifactMissing { artifact: ArtifactKind, path: PathBuf },

    #[error("Failed to read the {artifact} artifact at {}: {source}", .path.display())]
    Io {
        artifact: ArtifactKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode the {artifact} artifact at {}: {source}", .path.display())]
    Decode {
        artifact: ArtifactKind,
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("Similarity matrix has {rows} rows but the course table has {courses} courses")]
    ShapeMismatch { courses: usize, rows: usize },

    #[error("Similarity matrix row {row} has {len} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Similarity matrix has a non-finite score at row {row}, column {column}")]
    NonFiniteScore { row: usize, column: usize },
}

/// Course table, similarity matrix and derived lookups.
#[derive(Debug)]
pub struct CourseModel {
    courses: Vec<Course>,
    similarity: Vec<Vec<f64>>,
    names: Vec<String>,
    /// Course name -> row index (first occurrence wins)
    index: HashMap<String, usize>,
}

impl CourseModel {
    /// Build a model from already-deserialized artifacts.
    ///
    /// Fails if the matrix is not N×N for N courses or contains NaN/infinite
    /// scores. Duplicate course names and display names missing from the
    /// table are logged but accepted.
    pub fn from_parts(
        courses: Vec<Course>,
        similarity: Vec<Vec<f64>>,
        names: Vec<String>,
    ) -> Result<Self, ModelError> {
        let expected = courses.len();
        if similarity.len() != expected {
            return Err(ModelError::ShapeMismatch {
                courses: expected,
                rows: similarity.len(),
            });
        }

        for (row, scores) in similarity.iter().enumerate() {
            if scores.len() != expected {
                return Err(ModelError::RaggedRow {
                    row,
                    len: scores.len(),
                    expected,
                });
            }
            if let Some(column) = scores.iter().position(|score| !score.is_finite()) {
                return Err(ModelError::NonFiniteScore { row, column });
            }
        }

        let mut index = HashMap::with_capacity(courses.len());
        for (row, course) in courses.iter().enumerate() {
            if let Some(first) = index.get(&course.name) {
                tracing::warn!(
                    "Duplicate course name {:?} at rows {} and {}; lookups use row {}",
                    course.name,
                    first,
                    row,
                    first
                );
                continue;
            }
            index.insert(course.name.clone(), row);
        }

        let unknown = names.iter().filter(|name| !index.contains_key(*name)).count();
        if unknown > 0 {
            tracing::warn!(
                "{} of {} listed course names are not in the course table",
                unknown,
                names.len()
            );
        }

        Ok(Self {
            courses,
            similarity,
            names,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Course names offered for selection.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn course(&self, index: usize) -> Option<&Course> {
        self.courses.get(index)
    }

    /// Row index of a course, by exact name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn url_of(&self, name: &str) -> Option<&str> {
        self.index_of(name).map(|i| self.courses[i].url.as_str())
    }

    /// Similarity scores of one course against every course, in row order.
    pub fn similarity_row(&self, index: usize) -> Option<&[f64]> {
        self.similarity.get(index).map(Vec::as_slice)
    }
}
