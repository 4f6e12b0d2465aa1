//! Top-K course recommendations from the similarity matrix.

use std::cmp::Ordering;

use crate::course::Recommendation;
use crate::model::CourseModel;

/// Number of recommendations returned by [`CourseModel::recommend`].
pub const TOP_K: usize = 6;

impl CourseModel {
    /// The [`TOP_K`] courses most similar to `course_name`.
    ///
    /// See [`CourseModel::recommend_n`].
    pub fn recommend(&self, course_name: &str) -> Vec<Recommendation> {
        self.recommend_n(course_name, TOP_K)
    }

    /// Up to `limit` courses most similar to `course_name`, best first.
    ///
    /// Unknown names (exact, case-sensitive match) yield an empty list.
    /// Candidates are stably sorted by descending score, so equal scores keep
    /// row order. The first sorted entry is skipped as the course itself,
    /// which assumes self-similarity is the unique row maximum.
    pub fn recommend_n(&self, course_name: &str, limit: usize) -> Vec<Recommendation> {
        let Some(row) = self.index_of(course_name) else {
            tracing::debug!("No course named {:?}", course_name);
            return Vec::new();
        };
        let Some(scores) = self.similarity_row(row) else {
            return Vec::new();
        };

        let mut ranked: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
        // Scores are finite (checked at load), so partial_cmp never fails.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        if let Some(&(top, _)) = ranked.first() {
            if top != row {
                tracing::warn!(
                    "Course {:?} is not first in its own similarity ranking (row {} ranks first); \
                     results may include it",
                    course_name,
                    top
                );
            }
        }

        ranked
            .into_iter()
            .skip(1)
            .take(limit)
            .map(|(j, score)| {
                let course = &self.courses()[j];
                Recommendation {
                    name: course.name.clone(),
                    url: course.url.clone(),
                    score,
                }
            })
            .collect()
    }
}
