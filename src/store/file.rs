//! JSON-file-backed store: one `<collection>.json` array per collection.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{doc_id, field_matches, ContentStore, StoreError, WriteBatch, WriteOp};

/// Persistent [`ContentStore`] keeping each collection as a JSON array file
/// under a data directory.
///
/// Writers are serialized by an internal mutex and each collection file is
/// replaced via an atomic temp-file rename. A batch touching several
/// collections is committed in two phases: every file is staged to a temp
/// file first, then the renames run, so a failure before the rename phase
/// leaves all targets untouched. A failed rename restores the files already
/// renamed from their pre-images.
pub struct FileStore {
    data_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `data_dir`.
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir).await?;
        debug!(data_dir = %data_dir.display(), "Opened file store");
        Ok(Self {
            data_dir,
            write_lock: Mutex::new(()),
        })
    }

    /// The directory collection files live in.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{collection}.json"))
    }

    async fn load(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let path = self.collection_path(collection);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw)
            .map_err(|_| StoreError::CorruptCollection(collection.to_string()))
    }

    async fn raw_content(&self, collection: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.collection_path(collection)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// One collection file staged for commit: target path, new content, and the
/// content to restore on a failed rename (`None` when the file was absent).
struct StagedFile {
    target: PathBuf,
    content: String,
    pre_image: Option<String>,
}

#[async_trait]
impl ContentStore for FileStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let docs = self.load(collection).await?;
        Ok(docs.into_iter().find(|doc| doc_id(doc) == Some(id)))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        self.load(collection).await
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StoreError> {
        let docs = self.load(collection).await?;
        Ok(docs.into_iter().find(|doc| field_matches(doc, field, value)))
    }

    async fn find_by_field_excluding(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        exclude_id: &str,
    ) -> Result<Option<Value>, StoreError> {
        let docs = self.load(collection).await?;
        Ok(docs
            .into_iter()
            .find(|doc| field_matches(doc, field, value) && doc_id(doc) != Some(exclude_id)))
    }

    async fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }

        let _guard = self.write_lock.lock().await;

        // Load each affected collection once (keeping its on-disk pre-image
        // for rollback), apply every op in memory, then commit the results.
        let mut loaded: HashMap<String, Vec<Value>> = HashMap::new();
        let mut pre_images: HashMap<String, Option<String>> = HashMap::new();
        for op in batch.ops() {
            let name = op.collection();
            if !loaded.contains_key(name) {
                let docs = self.load(name).await?;
                loaded.insert(name.to_string(), docs);
                pre_images.insert(name.to_string(), self.raw_content(name).await?);
            }
        }

        for op in batch.into_ops() {
            match op {
                WriteOp::Put {
                    collection,
                    id,
                    doc,
                } => {
                    let docs = loaded.entry(collection).or_default();
                    match docs.iter_mut().find(|d| doc_id(d) == Some(id.as_str())) {
                        Some(existing) => *existing = doc,
                        None => docs.push(doc),
                    }
                }
                WriteOp::Delete { collection, id } => {
                    let docs = loaded.entry(collection).or_default();
                    docs.retain(|d| doc_id(d) != Some(id.as_str()));
                }
                WriteOp::DeleteWhere {
                    collection,
                    field,
                    value,
                } => {
                    let docs = loaded.entry(collection).or_default();
                    docs.retain(|d| !field_matches(d, &field, &value));
                }
            }
        }

        // Serialization errors abort before anything touches disk.
        let mut staged = Vec::with_capacity(loaded.len());
        for (collection, docs) in &loaded {
            staged.push(StagedFile {
                target: self.collection_path(collection),
                content: serde_json::to_string_pretty(docs)?,
                pre_image: pre_images.remove(collection.as_str()).flatten(),
            });
        }
        commit_staged(staged).await?;

        Ok(())
    }
}

/// Commit a set of collection files in two phases: write every temp file,
/// then rename them onto their targets. A failure in the write phase leaves
/// all targets untouched; a failed rename restores the files renamed before
/// it from their pre-images.
async fn commit_staged(staged: Vec<StagedFile>) -> io::Result<()> {
    tokio::task::spawn_blocking(move || -> io::Result<()> {
        use std::io::Write;

        let mut prepared = Vec::with_capacity(staged.len());
        for file in &staged {
            let parent = file.target.parent().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "Path has no parent directory")
            })?;
            let mut temp = NamedTempFile::new_in(parent)?;
            temp.write_all(file.content.as_bytes())?;
            temp.flush()?;
            prepared.push(temp);
        }

        for (index, (temp, file)) in prepared.into_iter().zip(&staged).enumerate() {
            // persist consumes the temp file, so nothing is left behind on
            // success
            if let Err(e) = temp.persist(&file.target) {
                restore_pre_images(&staged[..index]);
                return Err(e.error);
            }
        }
        Ok(())
    })
    .await
    .map_err(io::Error::other)?
}

/// Best-effort rollback of already-renamed collection files. Runs after the
/// commit has failed, so secondary errors are swallowed rather than masking
/// the original one.
fn restore_pre_images(committed: &[StagedFile]) {
    for file in committed {
        let result = match &file.pre_image {
            Some(content) => std::fs::write(&file.target, content),
            None => std::fs::remove_file(&file.target),
        };
        if let Err(e) = result {
            warn!(target_file = %file.target.display(), error = %e, "Rollback of collection file failed");
        }
    }
}
