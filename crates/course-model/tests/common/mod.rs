#![allow(dead_code)]

use course_model::{ArtifactFormat, ArtifactSources, ArtifactStore, CourseModel};
use once_cell::sync::Lazy;
use std::path::PathBuf;

/// Recommendations for "Machine Learning" in the fixture data, best first.
pub const MACHINE_LEARNING_RECS: [&str; 6] = [
    "Deep Learning Specialization",
    "Neural Networks and Deep Learning",
    "Data Science Foundations",
    "Python for Everybody",
    "Introduction to Statistics",
    "SQL for Data Analysis",
];

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Store reading the JSON fixtures in place, with no remote sources.
pub fn fixture_store() -> ArtifactStore {
    ArtifactStore::new(fixtures_dir(), ArtifactSources::default(), ArtifactFormat::Json)
        .expect("Failed to create fixture store")
}

// Shared model loaded once for all tests
pub static FIXTURE_MODEL: Lazy<CourseModel> = Lazy::new(|| {
    fixture_store().load().expect("Failed to load fixture model")
});
