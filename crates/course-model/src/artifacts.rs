//! Artifact caching and downloading.
//!
//! The three model artifacts (similarity matrix, course table, course name
//! list) are read from a local cache directory. Missing artifacts are fetched
//! from their configured URL once and never re-fetched while the cached file
//! exists.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::course::Course;
use crate::model::{CourseModel, ModelError};

/// One of the three serialized model files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Similarity,
    Courses,
    CourseList,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Similarity,
        ArtifactKind::Courses,
        ArtifactKind::CourseList,
    ];

    /// File name stem inside the cache directory.
    pub fn stem(self) -> &'static str {
        match self {
            ArtifactKind::Similarity => "similarity",
            ArtifactKind::Courses => "courses",
            ArtifactKind::CourseList => "course_list",
        }
    }
}

impl Display for ArtifactKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArtifactKind::Similarity => "similarity matrix",
            ArtifactKind::Courses => "course table",
            ArtifactKind::CourseList => "course list",
        };
        f.write_str(label)
    }
}

/// Encoding of the artifact files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    #[default]
    Json,
    Bincode,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

impl ArtifactFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactFormat::Json => "json",
            ArtifactFormat::Bincode => "bin",
        }
    }

    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T, DecodeError> {
        match self {
            ArtifactFormat::Json => Ok(serde_json::from_slice(bytes)?),
            ArtifactFormat::Bincode => Ok(bincode::deserialize(bytes)?),
        }
    }

    /// Encode a value the way `decode` expects it, for preparing artifacts.
    pub fn encode<T: Serialize>(self, value: &T) -> Result<Vec<u8>, DecodeError> {
        match self {
            ArtifactFormat::Json => Ok(serde_json::to_vec(value)?),
            ArtifactFormat::Bincode => Ok(bincode::serialize(value)?),
        }
    }
}

/// Remote locations of the artifacts. Any of them may be absent when the
/// cache directory is provisioned ahead of time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSources {
    #[serde(default)]
    pub similarity_url: Option<String>,
    #[serde(default)]
    pub courses_url: Option<String>,
    #[serde(default)]
    pub course_list_url: Option<String>,
}

impl ArtifactSources {
    pub fn url(&self, artifact: ArtifactKind) -> Option<&str> {
        match artifact {
            ArtifactKind::Similarity => self.similarity_url.as_deref(),
            ArtifactKind::Courses => self.courses_url.as_deref(),
            ArtifactKind::CourseList => self.course_list_url.as_deref(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("No URL configured for the {artifact} and nothing cached at {}", .path.display())]
    NoSource { artifact: ArtifactKind, path: PathBuf },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} downloading {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Local artifact cache backed by remote sources.
pub struct ArtifactStore {
    cache_dir: PathBuf,
    sources: ArtifactSources,
    format: ArtifactFormat,
    client: reqwest::Client,
}

impl ArtifactStore {
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        sources: ArtifactSources,
        format: ArtifactFormat,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            cache_dir: cache_dir.into(),
            sources,
            format,
            client,
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn format(&self) -> ArtifactFormat {
        self.format
    }

    /// Cache path of an artifact, whether or not it exists yet.
    pub fn path(&self, artifact: ArtifactKind) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}", artifact.stem(), self.format.extension()))
    }

    /// Make sure an artifact is cached locally, downloading it if needed.
    ///
    /// Returns the cache path. A failed download leaves nothing behind in the
    /// cache directory.
    pub async fn ensure(&self, artifact: ArtifactKind) -> Result<PathBuf, FetchError> {
        let path = self.path(artifact);

        if is_cached(&path).await {
            tracing::debug!("{} already cached at {}", artifact, path.display());
            return Ok(path);
        }

        let url = self
            .sources
            .url(artifact)
            .ok_or_else(|| FetchError::NoSource {
                artifact,
                path: path.clone(),
            })?;

        if !self.cache_dir.exists() {
            fs::create_dir_all(&self.cache_dir)
                .await
                .map_err(|source| FetchError::Io {
                    path: self.cache_dir.clone(),
                    source,
                })?;
            tracing::info!("Created cache directory: {}", self.cache_dir.display());
        }

        tracing::info!("Downloading {} from {}...", artifact, url);
        download_file(&self.client, url, &path).await?;
        tracing::info!("Downloaded {} to {}", artifact, path.display());

        Ok(path)
    }

    /// Ensure every artifact, logging failures instead of stopping.
    ///
    /// A failed artifact stays absent and surfaces later as
    /// [`ModelError::ArtifactMissing`] from [`ArtifactStore::load`].
    pub async fn ensure_all(&self) {
        for artifact in ArtifactKind::ALL {
            if let Err(err) = self.ensure(artifact).await {
                tracing::error!("Failed to fetch {}: {}", artifact, err);
            }
        }
    }

    /// Deserialize the cached artifacts into a validated model.
    pub fn load(&self) -> Result<CourseModel, ModelError> {
        let matrix: Vec<Vec<f64>> = self.read_artifact(ArtifactKind::Similarity)?;
        let courses: Vec<Course> = self.read_artifact(ArtifactKind::Courses)?;
        let names: Vec<String> = self.read_artifact(ArtifactKind::CourseList)?;

        let model = CourseModel::from_parts(courses, matrix, names)?;
        tracing::info!(
            "Loaded {} courses from {}",
            model.len(),
            self.cache_dir.display()
        );
        Ok(model)
    }

    fn read_artifact<T: DeserializeOwned>(&self, artifact: ArtifactKind) -> Result<T, ModelError> {
        let path = self.path(artifact);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ModelError::ArtifactMissing { artifact, path });
            }
            Err(source) => return Err(ModelError::Io { artifact, path, source }),
        };

        self.format
            .decode(&bytes)
            .map_err(|source| ModelError::Decode {
                artifact,
                path,
                source,
            })
    }
}

async fn is_cached(path: &Path) -> bool {
    matches!(fs::metadata(path).await, Ok(meta) if meta.is_file())
}

/// Download a single file, writing it under a temporary name and renaming it
/// into place once the whole body has arrived.
async fn download_file(client: &reqwest::Client, url: &str, dest: &Path) -> Result<(), FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let partial = partial_path(dest);

    if let Err(err) = write_body(response, url, &partial).await {
        let _ = fs::remove_file(&partial).await;
        return Err(err);
    }

    if let Err(source) = fs::rename(&partial, dest).await {
        let _ = fs::remove_file(&partial).await;
        return Err(FetchError::Io {
            path: dest.to_path_buf(),
            source,
        });
    }

    Ok(())
}

async fn write_body(response: reqwest::Response, url: &str, dest: &Path) -> Result<(), FetchError> {
    let io_err = |source: std::io::Error| FetchError::Io {
        path: dest.to_path_buf(),
        source,
    };

    let total_size = response.content_length();
    let mut stream = response.bytes_stream();

    let mut file = File::create(dest).await.map_err(io_err)?;
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        file.write_all(&chunk).await.map_err(io_err)?;
        downloaded += chunk.len() as u64;

        // Log progress for large files
        if let Some(total) = total_size {
            if total > 1_000_000 && downloaded % 10_000_000 < chunk.len() as u64 {
                let percent = (downloaded as f64 / total as f64) * 100.0;
                tracing::info!("  Progress: {:.1}%", percent);
            }
        }
    }

    file.flush().await.map_err(io_err)?;
    Ok(())
}

/// Sibling path used while a download is in flight.
fn partial_path(dest: &Path) -> PathBuf {
    use rand::Rng;
    let file_name = dest
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix: u32 = rand::rng().random();
    dest.with_file_name(format!("{}.part-{:08x}", file_name, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &Path, sources: ArtifactSources) -> ArtifactStore {
        ArtifactStore::new(dir, sources, ArtifactFormat::Json).unwrap()
    }

    #[test]
    fn test_cache_file_names_follow_format() {
        let json = ArtifactStore::new("models", ArtifactSources::default(), ArtifactFormat::Json).unwrap();
        let bin = ArtifactStore::new("models", ArtifactSources::default(), ArtifactFormat::Bincode).unwrap();

        assert_eq!(json.path(ArtifactKind::Similarity), Path::new("models/similarity.json"));
        assert_eq!(json.path(ArtifactKind::CourseList), Path::new("models/course_list.json"));
        assert_eq!(bin.path(ArtifactKind::Courses), Path::new("models/courses.bin"));
    }

    #[test]
    fn test_partial_path_stays_in_same_directory() {
        let dest = Path::new("/cache/similarity.json");
        let partial = partial_path(dest);

        assert_eq!(partial.parent(), dest.parent());
        assert!(partial
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("similarity.json.part-"));
    }

    #[test]
    fn test_format_parses_from_config_names() {
        let json: ArtifactFormat = serde_json::from_str(r#""json""#).unwrap();
        let bin: ArtifactFormat = serde_json::from_str(r#""bincode""#).unwrap();
        assert_eq!(json, ArtifactFormat::Json);
        assert_eq!(bin, ArtifactFormat::Bincode);
        assert_eq!(ArtifactFormat::default(), ArtifactFormat::Json);
    }

    #[tokio::test]
    async fn test_ensure_uses_cached_file_without_source() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(temp_dir.path(), ArtifactSources::default());
        fs::write(store.path(ArtifactKind::Courses), "[]").await.unwrap();

        let path = store.ensure(ArtifactKind::Courses).await.unwrap();
        assert_eq!(path, temp_dir.path().join("courses.json"));
    }

    #[tokio::test]
    async fn test_ensure_without_source_or_cache_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(temp_dir.path(), ArtifactSources::default());

        let err = store.ensure(ArtifactKind::Similarity).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::NoSource {
                artifact: ArtifactKind::Similarity,
                ..
            }
        ));
        assert!(!store.path(ArtifactKind::Similarity).exists());
    }

    #[tokio::test]
    async fn test_load_reports_missing_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(temp_dir.path(), ArtifactSources::default());
        store.ensure_all().await;

        let err = store.load().unwrap_err();
        assert!(matches!(
            err,
            ModelError::ArtifactMissing {
                artifact: ArtifactKind::Similarity,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_load_reports_unreadable_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(temp_dir.path(), ArtifactSources::default());
        // A directory where the file should be exists but cannot be read
        fs::create_dir(store.path(ArtifactKind::Similarity)).await.unwrap();

        let err = store.load().unwrap_err();
        assert!(
            matches!(
                err,
                ModelError::Io {
                    artifact: ArtifactKind::Similarity,
                    ..
                }
            ),
            "expected an IO error, got {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_load_reports_corrupt_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(temp_dir.path(), ArtifactSources::default());
        fs::write(store.path(ArtifactKind::Similarity), "[[1.0, 0.5], [0.5,")
            .await
            .unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(
            err,
            ModelError::Decode {
                artifact: ArtifactKind::Similarity,
                source: DecodeError::Json(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_load_reports_wrong_schema() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(temp_dir.path(), ArtifactSources::default());
        fs::write(store.path(ArtifactKind::Similarity), "[[1.0]]").await.unwrap();
        fs::write(store.path(ArtifactKind::Courses), r#"[{"title": "A"}]"#)
            .await
            .unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(
            err,
            ModelError::Decode {
                artifact: ArtifactKind::Courses,
                ..
            }
        ));
    }
}
