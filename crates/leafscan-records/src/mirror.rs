use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::MirrorError;
use crate::record::AnalysisRecord;

/// External document store that receives a copy of every record.
///
/// Implementations may be slow or unreachable; the store bounds each call
/// with a timeout and only logs the outcome.
#[async_trait]
pub trait RecordMirror: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    async fn persist(&self, record: &AnalysisRecord) -> Result<(), MirrorError>;
}

/// Document store that appends one JSON document per line to a file.
pub struct JsonlMirror {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlMirror {
    /// Open (or create) the collection file, creating parent directories.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, MirrorError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordMirror for JsonlMirror {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn persist(&self, record: &AnalysisRecord) -> Result<(), MirrorError> {
        let mut line =
            serde_json::to_vec(record).map_err(|e| MirrorError::Serialization(e.to_string()))?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}
