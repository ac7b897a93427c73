//! On-disk storage for uploaded student files.
//!
//! Layout: `{root}/students/photos` and `{root}/students/documents`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use bytes::Bytes;
use rand::RngExt;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::domain::repository::FileStore;
use crate::domain::types::{DocumentCategory, DocumentSlot};
use crate::error::RegistryError;

const MAX_NAME_ATTEMPTS: usize = 32;

#[derive(Clone, Debug)]
pub struct DiskFileStore {
    root: PathBuf,
}

impl DiskFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create both category directories if missing.
    pub async fn ensure_dirs(&self) -> anyhow::Result<()> {
        for category in [DocumentCategory::Photos, DocumentCategory::Documents] {
            let dir = self.dir(category);
            fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("create upload directory {}", dir.display()))?;
        }
        Ok(())
    }

    /// Directory served under `/api/uploads`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self, category: DocumentCategory) -> PathBuf {
        self.root.join("students").join(category.dir_name())
    }
}

/// `{stem}_{tag}_{n}{extension}` where `n` is in `0..10000`.
fn candidate_name(stem: &str, slot: DocumentSlot, extension: &str) -> String {
    let n: u32 = rand::rng().random_range(0..10000);
    format!("{stem}_{}_{n}{extension}", slot.file_tag())
}

/// Stored names are single path components.
fn is_plain_name(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\'])
        && Path::new(filename).components().count() == 1
}

impl FileStore for DiskFileStore {
    async fn store(
        &self,
        slot: DocumentSlot,
        stem: &str,
        extension: &str,
        bytes: Bytes,
    ) -> Result<String, RegistryError> {
        let dir = self.dir(slot.category());
        fs::create_dir_all(&dir)
            .await
            .context("create upload directory")?;
        for _ in 0..MAX_NAME_ATTEMPTS {
            let filename = candidate_name(stem, slot, extension);
            let path = dir.join(&filename);
            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(anyhow::Error::new(e).context("open upload file").into()),
            };
            if let Err(e) = file.write_all(&bytes).await {
                let _ = fs::remove_file(&path).await;
                return Err(anyhow::Error::new(e).context("write upload file").into());
            }
            file.flush().await.context("flush upload file")?;
            tracing::debug!(file = %filename, slot = slot.field_name(), "stored upload");
            return Ok(filename);
        }
        Err(anyhow::anyhow!("no free upload filename for {stem}").into())
    }

    async fn remove(&self, slot: DocumentSlot, filename: &str) -> Result<bool, RegistryError> {
        if !is_plain_name(filename) {
            tracing::warn!(file = %filename, "refusing to remove non-plain upload name");
            return Ok(false);
        }
        let path = self.dir(slot.category()).join(filename);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(anyhow::Error::new(e).context("remove upload file").into()),
        }
    }
}
