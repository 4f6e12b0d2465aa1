//! Course recommendations from a precomputed similarity matrix.
//!
//! The model is made of three artifacts produced offline: a course table, an
//! N×N similarity matrix aligned with the table rows, and the list of course
//! names offered for selection.
//!
//! ```no_run
//! use course_model::{ArtifactFormat, ArtifactSources, ArtifactStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ArtifactStore::new("models", ArtifactSources::default(), ArtifactFormat::Json)?;
//! store.ensure_all().await;
//! let model = store.load()?;
//!
//! for rec in model.recommend("Machine Learning") {
//!     println!("{} - {}", rec.name, rec.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod course;
pub mod model;
pub mod recommend;

pub use artifacts::{ArtifactFormat, ArtifactKind, ArtifactSources, ArtifactStore, DecodeError, FetchError};
pub use course::{Course, Recommendation};
pub use model::{CourseModel, ModelError};
pub use recommend::TOP_K;
