//! JSON document store. One pretty-printed JSON object per file under the data directory.
//!
//! `save` shallow-merges top-level keys into whatever is already on disk;
//! `load` of a missing document yields an empty object. Every
//! read-modify-write of a document holds that document's lock, and files are
//! replaced by persisting a fully written temp file from the same directory.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// A stored JSON object.
pub type Document = Map<String, Value>;

const USER_DATA_FILE: &str = "user_data.json";
const JOB_DATA_FILE: &str = "job_data.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Document {0} does not contain a JSON object")]
    NotAnObject(PathBuf),

    #[error("Invalid document id '{0}'")]
    InvalidKey(String),
}

/// Generated artifacts, one file per job or contact id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Resume,
    CoverLetter,
    InterviewPrep,
    Networking,
}

impl ArtifactKind {
    fn dir(self) -> &'static str {
        match self {
            ArtifactKind::Resume => "resumes",
            ArtifactKind::CoverLetter => "cover_letters",
            ArtifactKind::InterviewPrep => "interview_prep",
            ArtifactKind::Networking => "networking",
        }
    }

    fn file_prefix(self) -> &'static str {
        match self {
            ArtifactKind::Resume => "resume",
            ArtifactKind::CoverLetter => "cover_letter",
            ArtifactKind::InterviewPrep => "interview_prep",
            ArtifactKind::Networking => "networking",
        }
    }
}

/// Addresses one document in the store.
#[derive(Debug, Clone, Copy)]
pub enum DocumentKey<'a> {
    UserProfile,
    SavedJobs,
    Artifact(ArtifactKind, &'a str),
}

type LockTable = HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>;

#[derive(Clone)]
pub struct JsonStore {
    root: PathBuf,
    locks: Arc<Mutex<LockTable>>,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a key to its file path, rejecting ids that could escape the data directory.
    pub fn path_for(&self, key: DocumentKey<'_>) -> Result<PathBuf, StoreError> {
        match key {
            DocumentKey::UserProfile => Ok(self.root.join(USER_DATA_FILE)),
            DocumentKey::SavedJobs => Ok(self.root.join(JOB_DATA_FILE)),
            DocumentKey::Artifact(kind, id) => {
                validate_id(id)?;
                Ok(self
                    .root
                    .join(kind.dir())
                    .join(format!("{}_{id}.json", kind.file_prefix())))
            }
        }
    }

    /// Returns the stored document, or an empty object when it has never been saved.
    pub async fn load(&self, key: DocumentKey<'_>) -> Result<Document, StoreError> {
        let path = self.path_for(key)?;
        read_document(&path).await
    }

    /// Shallow-merges `record` into the stored document and returns the merged result.
    pub async fn save(
        &self,
        key: DocumentKey<'_>,
        record: Document,
    ) -> Result<Document, StoreError> {
        self.update(key, |doc| {
            doc.extend(record);
            doc.clone()
        })
        .await
    }

    /// Loads a document, applies `mutate`, and writes the result back while
    /// holding the document's lock. Returns whatever `mutate` returns.
    pub async fn update<T, F>(&self, key: DocumentKey<'_>, mutate: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Document) -> T + Send,
    {
        let path = self.path_for(key)?;
        let lock = self.lock_for(&path);
        let _guard = lock.lock().await;

        let mut doc = read_document(&path).await?;
        let output = mutate(&mut doc);
        write_document(&path, &doc).await?;
        Ok(output)
    }

    /// Hands out the lock for `path`. Entries nobody else holds are dropped first.
    fn lock_for(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        let mut table = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        table.retain(|_, lock| Arc::strong_count(lock) > 1);
        table.entry(path.to_path_buf()).or_default().clone()
    }
}

fn validate_id(id: &str) -> Result<(), StoreError> {
    let invalid = id.trim().is_empty()
        || id.contains(&['/', '\\', '\0'][..])
        || id.contains("..");
    if invalid {
        return Err(StoreError::InvalidKey(id.to_string()));
    }
    Ok(())
}

async fn read_document(path: &Path) -> Result<Document, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::new()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let value: Value = serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject(path.to_path_buf())),
    }
}

async fn write_document(path: &Path, doc: &Document) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(doc).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || persist_atomically(&target, &bytes))
        .await
        .map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, e),
        })??;

    debug!("Wrote {}", path.display());
    Ok(())
}

/// Writes into a uniquely named temp file next to `path`, then renames it over
/// `path`. The temp file is removed if any step fails.
fn persist_atomically(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let io_err = |source: io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = path.parent().ok_or_else(|| {
        io_err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "document path has no parent directory",
        ))
    })?;
    std::fs::create_dir_all(parent).map_err(io_err)?;

    let mut temp_file = NamedTempFile::new_in(parent).map_err(io_err)?;
    temp_file.write_all(bytes).map_err(io_err)?;
    temp_file.flush().map_err(io_err)?;
    temp_file.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
